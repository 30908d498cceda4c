// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permanent academic records: enrolled courses, marks and semester payments.

use std::collections::HashSet;

use registrar_core::RegistrarError;
use registrar_core::types::{
    EnrolledCourseStatus, ExamType, PaymentStatus, StudentEnrolledCourse,
    StudentEnrolledCourseMark, StudentSemesterPayment,
};
use rusqlite::{params, Connection};

use crate::database::Database;
use crate::models::{new_id, now};
use crate::queries::{keyed, people};

pub fn find_enrolled_course(
    conn: &Connection,
    student_id: &str,
    course_id: &str,
    academic_semester_id: &str,
) -> rusqlite::Result<Option<StudentEnrolledCourse>> {
    keyed::select_one(
        conn,
        "WHERE student_id = ?1 AND course_id = ?2 AND academic_semester_id = ?3",
        params![student_id, course_id, academic_semester_id],
    )
}

/// Insert an ONGOING enrolled course with no grade and zero marks.
pub fn insert_enrolled_course(
    conn: &Connection,
    student_id: &str,
    course_id: &str,
    academic_semester_id: &str,
) -> rusqlite::Result<StudentEnrolledCourse> {
    let record = StudentEnrolledCourse {
        id: new_id(),
        student_id: student_id.to_string(),
        course_id: course_id.to_string(),
        academic_semester_id: academic_semester_id.to_string(),
        grade: None,
        point: 0.0,
        total_marks: 0,
        status: EnrolledCourseStatus::Ongoing,
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO student_enrolled_courses (id, student_id, course_id, academic_semester_id,
             grade, point, total_marks, status, created_at)
         VALUES (?1, ?2, ?3, ?4, NULL, 0, 0, ?5, ?6)",
        params![
            record.id,
            record.student_id,
            record.course_id,
            record.academic_semester_id,
            record.status.to_string(),
            record.created_at,
        ],
    )?;
    Ok(record)
}

/// Insert a placeholder mark for one exam of an enrolled course.
pub fn insert_default_mark(
    conn: &Connection,
    enrolled: &StudentEnrolledCourse,
    exam_type: ExamType,
) -> rusqlite::Result<StudentEnrolledCourseMark> {
    let mark = StudentEnrolledCourseMark {
        id: new_id(),
        student_id: enrolled.student_id.clone(),
        student_enrolled_course_id: enrolled.id.clone(),
        academic_semester_id: enrolled.academic_semester_id.clone(),
        exam_type,
        grade: None,
        marks: 0,
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO student_enrolled_course_marks (id, student_id, student_enrolled_course_id,
             academic_semester_id, exam_type, grade, marks, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, NULL, 0, ?6)",
        params![
            mark.id,
            mark.student_id,
            mark.student_enrolled_course_id,
            mark.academic_semester_id,
            mark.exam_type.to_string(),
            mark.created_at,
        ],
    )?;
    Ok(mark)
}

pub fn marks_for_enrolled_course(
    conn: &Connection,
    enrolled_course_id: &str,
) -> rusqlite::Result<Vec<StudentEnrolledCourseMark>> {
    keyed::select(
        conn,
        "WHERE student_enrolled_course_id = ?1 ORDER BY exam_type DESC",
        params![enrolled_course_id],
    )
}

pub fn find_payment(
    conn: &Connection,
    student_id: &str,
    academic_semester_id: &str,
) -> rusqlite::Result<Option<StudentSemesterPayment>> {
    keyed::select_one(
        conn,
        "WHERE student_id = ?1 AND academic_semester_id = ?2",
        params![student_id, academic_semester_id],
    )
}

/// Insert a PENDING payment record with nothing paid yet.
pub fn insert_payment(
    conn: &Connection,
    student_id: &str,
    academic_semester_id: &str,
    full_payment_amount: i64,
    partial_payment_amount: i64,
) -> rusqlite::Result<StudentSemesterPayment> {
    let payment = StudentSemesterPayment {
        id: new_id(),
        student_id: student_id.to_string(),
        academic_semester_id: academic_semester_id.to_string(),
        full_payment_amount,
        partial_payment_amount,
        total_due_amount: full_payment_amount,
        total_paid_amount: 0,
        payment_status: PaymentStatus::Pending,
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO student_semester_payments (id, student_id, academic_semester_id,
             full_payment_amount, partial_payment_amount, total_due_amount, total_paid_amount,
             payment_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)",
        params![
            payment.id,
            payment.student_id,
            payment.academic_semester_id,
            payment.full_payment_amount,
            payment.partial_payment_amount,
            payment.total_due_amount,
            payment.payment_status.to_string(),
            payment.created_at,
        ],
    )?;
    Ok(payment)
}

/// Ids of the courses a student has COMPLETED in any semester.
pub fn completed_course_ids(conn: &Connection, student_id: &str) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT course_id FROM student_enrolled_courses WHERE student_id = ?1 AND status = ?2",
    )?;
    let rows = stmt.query_map(
        params![student_id, EnrolledCourseStatus::Completed.to_string()],
        |row| row.get(0),
    )?;
    rows.collect()
}

/// Enrolled courses of the student behind an external user id.
pub async fn enrolled_courses_of(
    db: &Database,
    student_user_id: &str,
) -> Result<Vec<StudentEnrolledCourse>, RegistrarError> {
    let user_id = student_user_id.to_string();
    db.transaction(move |tx| {
        let student = people::student_by_user_id(tx, &user_id)?;
        Ok(keyed::select(
            tx,
            "WHERE student_id = ?1 ORDER BY created_at, id",
            params![student.id],
        )?)
    })
    .await
}

/// Semester payments of the student behind an external user id.
pub async fn payments_of(
    db: &Database,
    student_user_id: &str,
) -> Result<Vec<StudentSemesterPayment>, RegistrarError> {
    let user_id = student_user_id.to_string();
    db.transaction(move |tx| {
        let student = people::student_by_user_id(tx, &user_id)?;
        Ok(keyed::select(
            tx,
            "WHERE student_id = ?1 ORDER BY created_at, id",
            params![student.id],
        )?)
    })
    .await
}
