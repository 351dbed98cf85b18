//! Driftwatch daemon
//!
//! Loads its configuration from the environment, then runs the fleet
//! orchestrator until Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use driftwatch_client::GitlabClient;
use driftwatch_daemon::{Config, FleetOrchestrator, TracingReporter};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driftwatch_daemon=info,driftwatch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Driftwatch daemon");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!("Loaded configuration: {:?}", config);

    let client = GitlabClient::new(&config.gitlab_url, config.token.clone(), config.client_options())
        .context("Failed to create GitLab client")?;

    let token = CancellationToken::new();
    tokio::spawn(shutdown_on_signal(token.clone()));

    let orchestrator = FleetOrchestrator::new(
        Arc::new(client),
        Arc::new(TracingReporter),
        config.fleet_settings(),
    );

    if let Err(e) = orchestrator.run(token).await {
        error!("Fleet orchestrator error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Cancels `token` on Ctrl-C or SIGTERM
async fn shutdown_on_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    warn!("Exiting...");
    token.cancel();
}
