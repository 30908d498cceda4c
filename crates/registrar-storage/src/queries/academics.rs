// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Academic faculties and departments.

use registrar_core::RegistrarError;
use registrar_core::types::{AcademicDepartment, AcademicFaculty};
use rusqlite::params;

use crate::database::Database;
use crate::models::{new_id, now};

pub async fn create_academic_faculty(
    db: &Database,
    title: &str,
) -> Result<AcademicFaculty, RegistrarError> {
    let faculty = AcademicFaculty {
        id: new_id(),
        title: title.to_string(),
        created_at: now(),
    };
    let row = faculty.clone();
    db.run(move |conn| {
        conn.execute(
            "INSERT INTO academic_faculties (id, title, created_at) VALUES (?1, ?2, ?3)",
            params![row.id, row.title, row.created_at],
        )
    })
    .await?;
    Ok(faculty)
}

pub async fn create_academic_department(
    db: &Database,
    title: &str,
    academic_faculty_id: &str,
) -> Result<AcademicDepartment, RegistrarError> {
    let department = AcademicDepartment {
        id: new_id(),
        title: title.to_string(),
        academic_faculty_id: academic_faculty_id.to_string(),
        created_at: now(),
    };
    let row = department.clone();
    db.run(move |conn| {
        conn.execute(
            "INSERT INTO academic_departments (id, title, academic_faculty_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![row.id, row.title, row.academic_faculty_id, row.created_at],
        )
    })
    .await?;
    Ok(department)
}
