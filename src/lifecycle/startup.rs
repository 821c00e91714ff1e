//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize metrics if enabled
//! - Seed the registry from configuration
//! - Start the gateway and the admin API
//! - Wait for a stop signal and fan it out
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when routes are registered)

use std::net::SocketAddr;
use tokio::task::JoinHandle;

use crate::admin::start_admin;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::Gateway;
use crate::lifecycle::{signals::wait_for_signal, Shutdown};
use crate::observability::metrics;

/// Run the gateway described by `config` until SIGINT/SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let gateway = Gateway::from_config(&config).await?;
    let shutdown = Shutdown::new();

    let handle = gateway.start(shutdown.subscribe()).await?;
    let admin = if config.admin.enabled {
        Some(start_admin(gateway.clone(), &config.admin, shutdown.subscribe()).await?)
    } else {
        None
    };

    shutdown.trigger_on(wait_for_signal()).await;

    handle.stopped().await;
    if let Some(task) = admin {
        join_admin(task).await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for the admin accept loop. Returns whether it ended cleanly.
async fn join_admin(task: JoinHandle<()>) -> bool {
    match task.await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Admin task failed");
            false
        }
    }
}
