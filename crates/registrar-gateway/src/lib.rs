// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Registrar backend.
//!
//! The gateway runs an axum server as a background task over a shared
//! [`Database`] handle. Requests authenticate with static bearer tokens from
//! the `[gateway]` config section; every business error is returned as
//! `{"error": "..."}` with a status derived from its kind.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod registrations;
pub mod server;

use async_trait::async_trait;
use registrar_config::model::GatewayConfig;
use registrar_core::{AdapterType, HealthStatus, PluginAdapter, RegistrarError};
use registrar_storage::Database;
use tokio::sync::Mutex;

use crate::auth::AuthConfig;
use crate::server::{GatewayState, HealthState};

pub use crate::auth::Principal;
pub use crate::error::ApiError;
pub use crate::server::router;

/// HTTP gateway adapter.
pub struct GatewayServer {
    config: GatewayConfig,
    state: GatewayState,
    server_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl GatewayServer {
    pub fn new(name: &str, config: GatewayConfig, db: Database) -> Self {
        let state = GatewayState {
            db,
            auth: AuthConfig::from_principals(&config.principals),
            health: HealthState {
                start_time: std::time::Instant::now(),
                name: name.to_string(),
            },
        };
        Self {
            config,
            state,
            server_handle: Mutex::new(None),
        }
    }

    /// Shared handler state, e.g. for driving [`router`] directly.
    pub fn state(&self) -> GatewayState {
        self.state.clone()
    }

    /// Bind the configured address and serve in a background task.
    ///
    /// Bind failures are returned here rather than from the task.
    pub async fn start(&self) -> Result<(), RegistrarError> {
        let mut handle = self.server_handle.lock().await;
        if handle.is_some() {
            return Err(RegistrarError::Internal("gateway already started".to_string()));
        }
        if self.state.auth.is_empty() {
            tracing::warn!("gateway has no principals configured -- every /v1 request will be rejected");
        }

        let listener = server::bind(&self.config.host, self.config.port).await?;
        let state = self.state.clone();
        *handle = Some(tokio::spawn(async move {
            if let Err(e) = server::serve(listener, state).await {
                tracing::error!(error = %e, "gateway server stopped");
            }
        }));

        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            "gateway started"
        );
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for GatewayServer {
    fn name(&self) -> &str {
        "gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, RegistrarError> {
        let handle = self.server_handle.lock().await;
        match handle.as_ref() {
            Some(h) if !h.is_finished() => Ok(HealthStatus::Healthy),
            Some(_) => Ok(HealthStatus::Unhealthy("server task exited".to_string())),
            None => Ok(HealthStatus::Unhealthy("server not started".to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), RegistrarError> {
        let mut handle = self.server_handle.lock().await;
        if let Some(h) = handle.take() {
            h.abort();
            tracing::info!("gateway stopped");
        }
        Ok(())
    }
}
