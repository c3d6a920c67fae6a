//! Startup load of the state boundaries.
//!
//! The topology is loaded once, in the background, when the server starts.
//! Pages render the loading placeholder until it arrives. A failed load is
//! logged and never retried; the placeholder then stays for the lifetime of
//! the process.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use backhoe_core::topology::TopologySource;

use crate::state::AppState;

/// Load the atlas from `source` into `state`. Returns whether it loaded.
pub async fn load_atlas(state: &AppState, source: &TopologySource, client: &reqwest::Client) -> bool {
    match source.load(client).await {
        Ok(atlas) => {
            info!(
                source = %source,
                states = atlas.states.len(),
                borders = atlas.borders.len(),
                "state atlas loaded"
            );
            state.set_atlas(atlas).await;
            true
        }
        Err(e) => {
            error!(source = %source, error = %e, "failed to load state atlas, map stays on placeholder");
            false
        }
    }
}

/// Start the one-shot load without waiting for it.
pub fn spawn_atlas_load(
    state: Arc<AppState>,
    source: TopologySource,
    client: reqwest::Client,
) -> JoinHandle<bool> {
    tokio::spawn(async move { load_atlas(&state, &source, &client).await })
}
