// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration engine for the Registrar backend.
//!
//! Owns the semester registration state machine, course enrollment and
//! withdrawal, class-schedule conflict detection, and the term rollover that
//! turns a finished registration into permanent academic records.

pub mod catalog;
pub mod conflict;
pub mod enrollment;
pub mod lifecycle;
pub mod rollover;
pub mod scheduling;

pub use catalog::{AvailableCourse, NewOfferedCourseSection, OfferCoursesRequest};
pub use conflict::{TimeSlot, has_conflict};
pub use lifecycle::{MyRegistration, RegistrationDetails, StartedRegistration};
pub use rollover::{RATE_PER_CREDIT, RolloverSummary};
