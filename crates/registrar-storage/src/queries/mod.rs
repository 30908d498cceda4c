// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for storage entities.
//!
//! Synchronous functions take a `&Connection` so callers can compose them
//! inside one [`crate::Database::transaction`]; async helpers wrap the
//! single-statement cases.

pub mod academics;
pub mod courses;
pub mod facilities;
pub mod keyed;
pub mod offerings;
pub mod people;
pub mod records;
pub mod registrations;
pub mod schedules;
pub mod semesters;
