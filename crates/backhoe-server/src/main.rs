//! Backhoe server entry point.
//!
//! Loads configuration, starts the one-shot topology load in the
//! background, then serves HTTP with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use backhoe_core::lead::LeadService;
use backhoe_core::service_areas::ServiceAreaDirectory;
use backhoe_mail::SmtpMailer;

use backhoe_server::config::ServerConfig;
use backhoe_server::geo;
use backhoe_server::routes;
use backhoe_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(topology = %config.topology, policy = ?config.failure_policy, "Backhoe starting");

    let state = Arc::new(build_app_state(&config).await?);
    info!(
        transport = state.leads.transport(),
        service_areas = state.directory.len(),
        "lead forwarding ready"
    );

    // Not awaited: pages show the placeholder until this lands.
    let _atlas_load = geo::spawn_atlas_load(
        Arc::clone(&state),
        config.topology.clone(),
        reqwest::Client::new(),
    );

    let app = routes::build_router(Arc::clone(&state));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Backhoe server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Backhoe server stopped");
    Ok(())
}

async fn build_app_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let directory = match &config.service_areas_file {
        Some(path) => ServiceAreaDirectory::from_file(path)
            .await
            .context("failed to load service areas")?,
        None => ServiceAreaDirectory::bundled().context("bundled service areas are invalid")?,
    };

    let mailer = SmtpMailer::new(config.mail.clone());
    if !mailer.is_configured() {
        warn!("mail relay is not fully configured, lead submissions will fail");
    }

    Ok(AppState::new(
        LeadService::new(Arc::new(mailer)),
        directory,
        config.failure_policy,
        config.public_dir.clone(),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
