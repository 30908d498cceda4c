// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly time-slot overlap detection.

use chrono::NaiveTime;
use registrar_core::RegistrarError;
use registrar_core::types::{ClassSchedule, DayOfWeek};
use tracing::warn;

/// Wall-clock format of schedule times.
pub const TIME_FORMAT: &str = "%H:%M";

/// One weekly slot: a weekday and a half-open `[start, end)` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub day_of_week: DayOfWeek,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Parse `HH:MM` times, rejecting empty or inverted ranges.
    pub fn parse(day_of_week: DayOfWeek, start: &str, end: &str) -> Result<Self, RegistrarError> {
        let start = parse_time(start)?;
        let end = parse_time(end)?;
        if start >= end {
            return Err(RegistrarError::bad_request(
                "start time must be before end time",
            ));
        }
        Ok(Self {
            day_of_week,
            start,
            end,
        })
    }

    /// The slot a stored schedule occupies. Rows with unreadable times are skipped.
    pub fn of_schedule(schedule: &ClassSchedule) -> Option<Self> {
        match Self::parse(schedule.day_of_week, &schedule.start_time, &schedule.end_time) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!(schedule_id = %schedule.id, error = %e, "ignoring unreadable schedule times");
                None
            }
        }
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day_of_week == other.day_of_week && self.start < other.end && self.end > other.start
    }
}

pub fn parse_time(value: &str) -> Result<NaiveTime, RegistrarError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| RegistrarError::bad_request(format!("invalid time `{value}`, expected HH:MM")))
}

/// Whether `candidate` clashes with any slot in `existing`.
///
/// Slots on other weekdays never clash. Touching ranges (one ends exactly
/// when the next starts) do not clash.
pub fn has_conflict(existing: &[TimeSlot], candidate: &TimeSlot) -> bool {
    existing
        .iter()
        .filter(|slot| slot.day_of_week == candidate.day_of_week)
        .any(|slot| candidate.start < slot.end && candidate.end > slot.start)
}
