// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Registrar academic-records backend.
//!
//! This crate provides the error taxonomy, the domain records shared by the
//! storage, registration and gateway crates, and the adapter traits that
//! infrastructure components implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RegistrarError;
pub use types::{AdapterType, HealthStatus, Role, SemesterRegistrationStatus};

pub use traits::{PluginAdapter, StorageAdapter};
