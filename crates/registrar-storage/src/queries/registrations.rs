// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semester registrations, student envelopes and course selections.

use registrar_core::types::{
    NewSemesterRegistration, PageMeta, PageRequest, Paginated, SemesterRegistration,
    SemesterRegistrationFilter, SemesterRegistrationStatus, StudentSemesterRegistration,
    StudentSemesterRegistrationCourse,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::models::{new_id, now, selection_from_row, KeyedRecord, SELECTION_COLUMNS};
use crate::queries::keyed;

// --- Semester registrations ---

pub fn insert_registration(
    conn: &Connection,
    new: &NewSemesterRegistration,
) -> rusqlite::Result<SemesterRegistration> {
    let timestamp = now();
    let registration = SemesterRegistration {
        id: new_id(),
        academic_semester_id: new.academic_semester_id.clone(),
        start_date: new.start_date,
        end_date: new.end_date,
        min_credit: new.min_credit,
        max_credit: new.max_credit,
        status: SemesterRegistrationStatus::Upcoming,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    conn.execute(
        "INSERT INTO semester_registrations (id, academic_semester_id, start_date, end_date,
             min_credit, max_credit, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            registration.id,
            registration.academic_semester_id,
            registration.start_date,
            registration.end_date,
            registration.min_credit,
            registration.max_credit,
            registration.status.to_string(),
            registration.created_at,
            registration.updated_at,
        ],
    )?;
    Ok(registration)
}

/// The registration that is UPCOMING or ONGOING, if any.
pub fn active_registration(conn: &Connection) -> rusqlite::Result<Option<SemesterRegistration>> {
    keyed::select_one(
        conn,
        "WHERE status IN ('UPCOMING', 'ONGOING') ORDER BY created_at DESC LIMIT 1",
        [],
    )
}

pub fn registration_with_status(
    conn: &Connection,
    status: SemesterRegistrationStatus,
) -> rusqlite::Result<Option<SemesterRegistration>> {
    keyed::select_one(
        conn,
        "WHERE status = ?1 ORDER BY created_at DESC LIMIT 1",
        params![status.to_string()],
    )
}

/// Page through registrations matching `filter`, newest first.
pub fn list_registrations(
    conn: &Connection,
    filter: &SemesterRegistrationFilter,
    page: PageRequest,
) -> rusqlite::Result<Paginated<SemesterRegistration>> {
    let mut conditions = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    if let Some(semester_id) = &filter.academic_semester_id {
        values.push(Value::Text(semester_id.clone()));
        conditions.push(format!("academic_semester_id = ?{}", values.len()));
    }
    if let Some(status) = filter.status {
        values.push(Value::Text(status.to_string()));
        conditions.push(format!("status = ?{}", values.len()));
    }
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let total: i64 = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM {} {where_clause}",
            SemesterRegistration::TABLE
        ),
        params_from_iter(values.iter()),
        |row| row.get(0),
    )?;

    let limit_at = values.len() + 1;
    values.push(Value::Integer(i64::from(page.limit)));
    values.push(Value::Integer(i64::from(page.offset())));
    let data = keyed::select(
        conn,
        &format!(
            "{where_clause} ORDER BY created_at DESC, id LIMIT ?{limit_at} OFFSET ?{}",
            limit_at + 1
        ),
        params_from_iter(values.iter()),
    )?;

    Ok(Paginated {
        meta: PageMeta {
            page: page.page,
            limit: page.limit,
            total: u64::try_from(total).unwrap_or_default(),
        },
        data,
    })
}

/// Persist every mutable field of `registration` and bump `updated_at`.
pub fn update_registration(
    conn: &Connection,
    registration: &SemesterRegistration,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE semester_registrations
         SET start_date = ?2, end_date = ?3, min_credit = ?4, max_credit = ?5,
             status = ?6, updated_at = ?7
         WHERE id = ?1",
        params![
            registration.id,
            registration.start_date,
            registration.end_date,
            registration.min_credit,
            registration.max_credit,
            registration.status.to_string(),
            now(),
        ],
    )
}

// --- Student envelopes ---

pub fn find_envelope(
    conn: &Connection,
    student_id: &str,
    registration_id: &str,
) -> rusqlite::Result<Option<StudentSemesterRegistration>> {
    keyed::select_one(
        conn,
        "WHERE student_id = ?1 AND semester_registration_id = ?2",
        params![student_id, registration_id],
    )
}

/// Create the envelope if it does not exist yet and return it.
pub fn ensure_envelope(
    conn: &Connection,
    student_id: &str,
    registration_id: &str,
) -> rusqlite::Result<StudentSemesterRegistration> {
    let timestamp = now();
    conn.execute(
        "INSERT OR IGNORE INTO student_semester_registrations
             (id, student_id, semester_registration_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![new_id(), student_id, registration_id, timestamp],
    )?;
    find_envelope(conn, student_id, registration_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Add `delta` (possibly negative) to an envelope's credit counter.
pub fn add_credits(conn: &Connection, envelope_id: &str, delta: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE student_semester_registrations
         SET total_credits_taken = total_credits_taken + ?2, updated_at = ?3
         WHERE id = ?1",
        params![envelope_id, delta, now()],
    )
}

pub fn confirm_envelope(conn: &Connection, envelope_id: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE student_semester_registrations SET is_confirmed = 1, updated_at = ?2
         WHERE id = ?1",
        params![envelope_id, now()],
    )
}

pub fn confirmed_envelopes(
    conn: &Connection,
    registration_id: &str,
) -> rusqlite::Result<Vec<StudentSemesterRegistration>> {
    keyed::select(
        conn,
        "WHERE semester_registration_id = ?1 AND is_confirmed = 1 ORDER BY created_at, id",
        params![registration_id],
    )
}

// --- Course selections ---

pub fn insert_selection(
    conn: &Connection,
    selection: &StudentSemesterRegistrationCourse,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO student_semester_registration_courses (semester_registration_id,
             student_id, offered_course_id, offered_course_section_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            selection.semester_registration_id,
            selection.student_id,
            selection.offered_course_id,
            selection.offered_course_section_id,
            selection.created_at,
        ],
    )?;
    Ok(())
}

/// Delete the selection keyed by (registration, student, offered course).
///
/// Returns the section the deleted row referenced, or `None` when no row matched.
pub fn delete_selection(
    conn: &Connection,
    registration_id: &str,
    student_id: &str,
    offered_course_id: &str,
) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "DELETE FROM student_semester_registration_courses
         WHERE semester_registration_id = ?1 AND student_id = ?2 AND offered_course_id = ?3
         RETURNING offered_course_section_id",
        params![registration_id, student_id, offered_course_id],
        |row| row.get(0),
    )
    .optional()
}

pub fn selections_for_student(
    conn: &Connection,
    registration_id: &str,
    student_id: &str,
) -> rusqlite::Result<Vec<StudentSemesterRegistrationCourse>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECTION_COLUMNS} FROM student_semester_registration_courses
         WHERE semester_registration_id = ?1 AND student_id = ?2
         ORDER BY created_at, offered_course_id"
    ))?;
    let rows = stmt.query_map(params![registration_id, student_id], selection_from_row)?;
    rows.collect()
}
