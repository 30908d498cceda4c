// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Students and faculty members.
//!
//! Both carry an external user id (`student_id` / `faculty_id`) which is what
//! authenticated principals present; internal `id`s never leave the backend
//! as identity.

use registrar_core::RegistrarError;
use registrar_core::types::{Faculty, NewFaculty, NewStudent, Student};
use rusqlite::{params, Connection};

use crate::database::{Database, TxError};
use crate::models::{new_id, now};
use crate::queries::keyed;

pub async fn create_student(db: &Database, new: NewStudent) -> Result<Student, RegistrarError> {
    let student = Student {
        id: new_id(),
        student_id: new.student_id,
        first_name: new.first_name,
        last_name: new.last_name,
        email: new.email,
        academic_department_id: new.academic_department_id,
        academic_faculty_id: new.academic_faculty_id,
        created_at: now(),
    };
    let row = student.clone();
    db.run(move |conn| {
        conn.execute(
            "INSERT INTO students (id, student_id, first_name, last_name, email,
                 academic_department_id, academic_faculty_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.id,
                row.student_id,
                row.first_name,
                row.last_name,
                row.email,
                row.academic_department_id,
                row.academic_faculty_id,
                row.created_at,
            ],
        )
    })
    .await?;
    Ok(student)
}

pub async fn create_faculty(db: &Database, new: NewFaculty) -> Result<Faculty, RegistrarError> {
    let faculty = Faculty {
        id: new_id(),
        faculty_id: new.faculty_id,
        first_name: new.first_name,
        last_name: new.last_name,
        email: new.email,
        academic_department_id: new.academic_department_id,
        academic_faculty_id: new.academic_faculty_id,
        created_at: now(),
    };
    let row = faculty.clone();
    db.run(move |conn| {
        conn.execute(
            "INSERT INTO faculties (id, faculty_id, first_name, last_name, email,
                 academic_department_id, academic_faculty_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.id,
                row.faculty_id,
                row.first_name,
                row.last_name,
                row.email,
                row.academic_department_id,
                row.academic_faculty_id,
                row.created_at,
            ],
        )
    })
    .await?;
    Ok(faculty)
}

/// Resolve a student by the external user id an auth principal carries.
pub fn student_by_user_id(conn: &Connection, user_id: &str) -> Result<Student, TxError> {
    keyed::select_one::<Student>(conn, "WHERE student_id = ?1", params![user_id])?
        .ok_or_else(|| keyed::not_found::<Student>().into())
}

/// Async form of [`student_by_user_id`].
pub async fn find_student_by_user_id(
    db: &Database,
    user_id: &str,
) -> Result<Student, RegistrarError> {
    let user_id = user_id.to_string();
    db.run(move |conn| keyed::select_one::<Student>(conn, "WHERE student_id = ?1", params![user_id]))
        .await?
        .ok_or_else(keyed::not_found::<Student>)
}
