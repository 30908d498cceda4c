// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offered courses and their sections, including the seat counter.

use registrar_core::types::{OfferedCourse, OfferedCourseSection};
use rusqlite::{params, Connection};

use crate::models::{new_id, now};
use crate::queries::keyed;

/// Offer `course_id` under a department for a registration.
///
/// Returns `false` when the triple was already offered.
pub fn offer_course(
    conn: &Connection,
    course_id: &str,
    academic_department_id: &str,
    semester_registration_id: &str,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO offered_courses
             (id, course_id, academic_department_id, semester_registration_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_id(),
            course_id,
            academic_department_id,
            semester_registration_id,
            now()
        ],
    )?;
    Ok(inserted == 1)
}

pub fn find_offered_course(
    conn: &Connection,
    course_id: &str,
    academic_department_id: &str,
    semester_registration_id: &str,
) -> rusqlite::Result<Option<OfferedCourse>> {
    keyed::select_one(
        conn,
        "WHERE course_id = ?1 AND academic_department_id = ?2 AND semester_registration_id = ?3",
        params![course_id, academic_department_id, semester_registration_id],
    )
}

/// Offered courses of one department within a registration.
pub fn offered_courses_for_department(
    conn: &Connection,
    semester_registration_id: &str,
    academic_department_id: &str,
) -> rusqlite::Result<Vec<OfferedCourse>> {
    keyed::select(
        conn,
        "WHERE semester_registration_id = ?1 AND academic_department_id = ?2
         ORDER BY created_at, id",
        params![semester_registration_id, academic_department_id],
    )
}

pub fn insert_section(
    conn: &Connection,
    title: &str,
    max_capacity: Option<i64>,
    offered_course: &OfferedCourse,
) -> rusqlite::Result<OfferedCourseSection> {
    let section = OfferedCourseSection {
        id: new_id(),
        title: title.to_string(),
        max_capacity,
        currently_enrolled_student: 0,
        offered_course_id: offered_course.id.clone(),
        semester_registration_id: offered_course.semester_registration_id.clone(),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO offered_course_sections (id, title, max_capacity,
             currently_enrolled_student, offered_course_id, semester_registration_id, created_at)
         VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6)",
        params![
            section.id,
            section.title,
            section.max_capacity,
            section.offered_course_id,
            section.semester_registration_id,
            section.created_at,
        ],
    )?;
    Ok(section)
}

pub fn sections_for_offered_course(
    conn: &Connection,
    offered_course_id: &str,
) -> rusqlite::Result<Vec<OfferedCourseSection>> {
    keyed::select(
        conn,
        "WHERE offered_course_id = ?1 ORDER BY title, id",
        params![offered_course_id],
    )
}

/// Take one seat in a section if it has room.
///
/// The capacity check and the increment are one statement, so the counter
/// never passes `max_capacity`. Returns `false` when the section is full.
pub fn take_seat(conn: &Connection, section_id: &str) -> rusqlite::Result<bool> {
    let updated = conn.execute(
        "UPDATE offered_course_sections
         SET currently_enrolled_student = currently_enrolled_student + 1
         WHERE id = ?1
           AND (max_capacity IS NULL OR currently_enrolled_student < max_capacity)",
        params![section_id],
    )?;
    Ok(updated == 1)
}

/// Give back one seat. A counter already at zero fails the CHECK constraint.
pub fn release_seat(conn: &Connection, section_id: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE offered_course_sections
         SET currently_enrolled_student = currently_enrolled_student - 1
         WHERE id = ?1",
        params![section_id],
    )
}
