// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Registrar backend.

use thiserror::Error;

use crate::types::SemesterRegistrationStatus;

/// The primary error type used across Registrar crates.
///
/// `NotFound`, `Conflict`, `BadRequest` and `InvalidTransition` are business
/// outcomes the gateway surfaces to callers; the rest are infrastructure faults.
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// An invariant would be violated (duplicate key, double booking, active registration).
    #[error("{0}")]
    Conflict(String),

    /// A business rule rejected the request.
    #[error("{0}")]
    BadRequest(String),

    /// A semester registration status change outside UPCOMING -> ONGOING -> ENDED.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: SemesterRegistrationStatus,
        to: SemesterRegistrationStatus,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistrarError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Returns true for the error kinds a caller caused, as opposed to faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Conflict(_)
                | Self::BadRequest(_)
                | Self::InvalidTransition { .. }
        )
    }
}
