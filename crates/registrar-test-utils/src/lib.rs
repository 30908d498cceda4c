// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Registrar integration tests.
//!
//! [`TestHarness`] opens a throwaway SQLite database and seeds the academic
//! structure every registration scenario needs: a faculty and department, a
//! current and a next semester, rooms, instructors and students, plus bearer
//! principals for driving the gateway.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder, ADMIN_TOKEN};
