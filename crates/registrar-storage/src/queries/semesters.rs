// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Academic semesters and the current-semester singleton.

use registrar_core::RegistrarError;
use registrar_core::types::{AcademicSemester, NewAcademicSemester};
use rusqlite::{params, Connection, OptionalExtension};

use crate::database::Database;
use crate::models::{new_id, now};
use crate::queries::keyed;

/// Create a semester. The code must match the title's fixed code.
pub async fn create_semester(
    db: &Database,
    new: NewAcademicSemester,
) -> Result<AcademicSemester, RegistrarError> {
    let expected = new.title.code();
    if new.code != expected {
        return Err(RegistrarError::bad_request(format!(
            "invalid semester code {} for {}, expected {expected}",
            new.code, new.title
        )));
    }

    let id = new_id();
    let created_at = now();
    let row_id = id.clone();
    db.run(move |conn| {
        conn.execute(
            "INSERT INTO academic_semesters
                 (id, year, title, code, start_month, end_month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row_id,
                new.year,
                new.title.to_string(),
                new.code,
                new.start_month,
                new.end_month,
                created_at,
            ],
        )?;
        keyed::find::<AcademicSemester>(conn, &row_id)
    })
    .await?
    .ok_or_else(keyed::not_found::<AcademicSemester>)
}

/// Id of the current semester, if one has been activated.
pub fn current_semester_id(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT academic_semester_id FROM current_academic_semester WHERE id = 1",
        [],
        |row| row.get(0),
    )
    .optional()
}

/// Point the singleton at `semester_id`, replacing any previous current semester.
pub fn set_current_semester(conn: &Connection, semester_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO current_academic_semester (id, academic_semester_id) VALUES (1, ?1)
         ON CONFLICT (id) DO UPDATE SET academic_semester_id = excluded.academic_semester_id",
        params![semester_id],
    )?;
    Ok(())
}

/// The current semester, if any.
pub async fn current_semester(db: &Database) -> Result<Option<AcademicSemester>, RegistrarError> {
    db.run(|conn| match current_semester_id(conn)? {
        Some(id) => keyed::find::<AcademicSemester>(conn, &id),
        None => Ok(None),
    })
    .await
}
