// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `registrar serve` command implementation.
//!
//! Opens storage, starts the HTTP gateway, and runs until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use registrar_config::RegistrarConfig;
use registrar_core::{HealthStatus, PluginAdapter, RegistrarError, StorageAdapter};
use registrar_gateway::GatewayServer;
use registrar_storage::SqliteStorage;
use registrar_storage::queries::semesters;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::shutdown;

/// Interval between background adapter health checks.
const HEALTH_INTERVAL: Duration = Duration::from_secs(60);

/// Run the server until a shutdown signal arrives.
pub async fn run_serve(config: RegistrarConfig) -> Result<(), RegistrarError> {
    init_tracing(&config.server.log_level);
    info!(
        name = %config.server.name,
        version = env!("CARGO_PKG_VERSION"),
        "starting registrar"
    );

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    let db = storage.database()?.clone();
    info!(path = %config.storage.database_path, "storage initialized");

    match semesters::current_semester(&db).await? {
        Some(semester) => info!(
            semester_id = %semester.id,
            year = semester.year,
            title = %semester.title,
            "current semester"
        ),
        None => warn!("no current semester is set"),
    }

    let gateway = Arc::new(GatewayServer::new(
        &config.server.name,
        config.gateway.clone(),
        db,
    ));
    gateway.start().await?;

    let cancel = shutdown::install_signal_handler();
    {
        let adapters: Vec<Arc<dyn PluginAdapter>> = vec![storage.clone(), gateway.clone()];
        let monitor_cancel = cancel.clone();
        tokio::spawn(async move {
            health_monitor(adapters, monitor_cancel).await;
        });
    }

    cancel.cancelled().await;

    gateway.shutdown().await?;
    storage.close().await?;
    info!("registrar serve shutdown complete");
    Ok(())
}

/// Periodically health-check every adapter and log the ones that are not healthy.
async fn health_monitor(adapters: Vec<Arc<dyn PluginAdapter>>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(HEALTH_INTERVAL);
    // Skip the first immediate tick.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for adapter in &adapters {
                    match adapter.health_check().await {
                        Ok(HealthStatus::Healthy) => {
                            debug!(adapter = adapter.name(), "adapter healthy");
                        }
                        Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
                            warn!(adapter = adapter.name(), reason = %reason, "adapter not healthy");
                        }
                        Err(e) => {
                            warn!(adapter = adapter.name(), error = %e, "health check failed");
                        }
                    }
                }
            }
            _ = cancel.cancelled() => {
                debug!("health monitor shutting down");
                break;
            }
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "registrar={log_level},registrar_gateway={log_level},\
             registrar_registration={log_level},registrar_storage={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
