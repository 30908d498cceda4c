// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Class schedule booking with room and faculty double-booking checks.

use registrar_core::RegistrarError;
use registrar_core::types::{ClassSchedule, Faculty, NewClassSchedule, OfferedCourseSection, Room};
use registrar_storage::Database;
use registrar_storage::queries::{keyed, schedules};
use tracing::info;

use crate::conflict::{TIME_FORMAT, TimeSlot, has_conflict};

fn booked(rows: &[ClassSchedule]) -> Vec<TimeSlot> {
    rows.iter().filter_map(TimeSlot::of_schedule).collect()
}

/// Book a weekly slot for a section.
///
/// Neither the room nor the faculty member may already hold an overlapping
/// slot on the same weekday, whichever registration that slot belongs to.
pub async fn create_schedule(
    db: &Database,
    mut new: NewClassSchedule,
) -> Result<ClassSchedule, RegistrarError> {
    let slot = TimeSlot::parse(new.day_of_week, &new.start_time, &new.end_time)?;
    new.start_time = slot.start.format(TIME_FORMAT).to_string();
    new.end_time = slot.end.format(TIME_FORMAT).to_string();

    let schedule = db
        .transaction(move |tx| {
            let section = keyed::require::<OfferedCourseSection>(tx, &new.offered_course_section_id)?;
            keyed::require::<Room>(tx, &new.room_id)?;
            keyed::require::<Faculty>(tx, &new.faculty_id)?;

            let room = schedules::room_slots(tx, &new.room_id, new.day_of_week)?;
            if has_conflict(&booked(&room), &slot) {
                return Err(RegistrarError::conflict("room is already booked into this slot").into());
            }
            let faculty =
                schedules::faculty_slots(tx, &new.faculty_id, new.day_of_week)?;
            if has_conflict(&booked(&faculty), &slot) {
                return Err(
                    RegistrarError::conflict("faculty is already booked into this slot").into(),
                );
            }

            Ok(schedules::insert_schedule(
                tx,
                &new,
                &section.semester_registration_id,
            )?)
        })
        .await?;

    info!(
        schedule_id = %schedule.id,
        section_id = %schedule.offered_course_section_id,
        day = %schedule.day_of_week,
        start = %schedule.start_time,
        end = %schedule.end_time,
        "class schedule booked"
    );
    Ok(schedule)
}

pub async fn list_for_section(
    db: &Database,
    section_id: &str,
) -> Result<Vec<ClassSchedule>, RegistrarError> {
    keyed::find_by_id::<OfferedCourseSection>(db, section_id).await?;
    schedules::list_schedules_for_section(db, section_id).await
}
