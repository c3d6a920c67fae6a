//! Shared application state for the Backhoe server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. The atlas slot is the only value written after
//! startup: it is filled once when the topology load finishes.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use backhoe_core::lead::{LeadService, MailFailurePolicy};
use backhoe_core::service_areas::ServiceAreaDirectory;
use backhoe_core::topology::StateAtlas;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Decoded state boundaries; `None` until the startup load succeeds.
    pub atlas: RwLock<Option<Arc<StateAtlas>>>,
    /// Forwards leads through the mail transport.
    pub leads: LeadService,
    /// States and cities for the service-area pages.
    pub directory: ServiceAreaDirectory,
    /// What the dialogs show when sending fails.
    pub failure_policy: MailFailurePolicy,
    /// Root of the static files served under `/images`.
    pub public_dir: PathBuf,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("leads", &self.leads)
            .field("states", &self.directory.len())
            .field("failure_policy", &self.failure_policy)
            .field("public_dir", &self.public_dir)
            .finish_non_exhaustive()
    }
}

impl AppState {
    #[must_use]
    pub fn new(
        leads: LeadService,
        directory: ServiceAreaDirectory,
        failure_policy: MailFailurePolicy,
        public_dir: PathBuf,
    ) -> Self {
        Self {
            atlas: RwLock::new(None),
            leads,
            directory,
            failure_policy,
            public_dir,
        }
    }

    /// The atlas, if it has loaded.
    pub async fn atlas(&self) -> Option<Arc<StateAtlas>> {
        self.atlas.read().await.clone()
    }

    pub async fn set_atlas(&self, atlas: StateAtlas) {
        *self.atlas.write().await = Some(Arc::new(atlas));
    }
}
