// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly class schedules of offered course sections.

use registrar_core::RegistrarError;
use registrar_core::types::{ClassSchedule, DayOfWeek, NewClassSchedule};
use rusqlite::{params, Connection};

use crate::database::Database;
use crate::models::{new_id, now};
use crate::queries::keyed;

pub fn insert_schedule(
    conn: &Connection,
    new: &NewClassSchedule,
    semester_registration_id: &str,
) -> rusqlite::Result<ClassSchedule> {
    let schedule = ClassSchedule {
        id: new_id(),
        day_of_week: new.day_of_week,
        start_time: new.start_time.clone(),
        end_time: new.end_time.clone(),
        offered_course_section_id: new.offered_course_section_id.clone(),
        semester_registration_id: semester_registration_id.to_string(),
        room_id: new.room_id.clone(),
        faculty_id: new.faculty_id.clone(),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO offered_course_class_schedules (id, day_of_week, start_time, end_time,
             offered_course_section_id, semester_registration_id, room_id, faculty_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            schedule.id,
            schedule.day_of_week.to_string(),
            schedule.start_time,
            schedule.end_time,
            schedule.offered_course_section_id,
            schedule.semester_registration_id,
            schedule.room_id,
            schedule.faculty_id,
            schedule.created_at,
        ],
    )?;
    Ok(schedule)
}

/// Slots already booked in a room on one weekday, across every registration.
pub fn room_slots(
    conn: &Connection,
    room_id: &str,
    day: DayOfWeek,
) -> rusqlite::Result<Vec<ClassSchedule>> {
    keyed::select(
        conn,
        "WHERE room_id = ?1 AND day_of_week = ?2",
        params![room_id, day.to_string()],
    )
}

/// Slots already taught by a faculty member on one weekday, across every registration.
pub fn faculty_slots(
    conn: &Connection,
    faculty_id: &str,
    day: DayOfWeek,
) -> rusqlite::Result<Vec<ClassSchedule>> {
    keyed::select(
        conn,
        "WHERE faculty_id = ?1 AND day_of_week = ?2",
        params![faculty_id, day.to_string()],
    )
}

/// Schedules of a section in week order, then by start time.
pub fn schedules_for_section(
    conn: &Connection,
    section_id: &str,
) -> rusqlite::Result<Vec<ClassSchedule>> {
    let mut schedules: Vec<ClassSchedule> = keyed::select(
        conn,
        "WHERE offered_course_section_id = ?1",
        params![section_id],
    )?;
    // Day names sort alphabetically in SQL; order by the enum instead.
    schedules.sort_by(|a, b| {
        (a.day_of_week, &a.start_time).cmp(&(b.day_of_week, &b.start_time))
    });
    Ok(schedules)
}

/// Async form of [`schedules_for_section`].
pub async fn list_schedules_for_section(
    db: &Database,
    section_id: &str,
) -> Result<Vec<ClassSchedule>, RegistrarError> {
    let section_id = section_id.to_string();
    db.run(move |conn| schedules_for_section(conn, &section_id))
        .await
}
