// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Term rollover: turn confirmed selections into permanent records.
//!
//! Every step checks for an existing record first, so running the rollover
//! twice for the same registration creates nothing new.

use registrar_core::RegistrarError;
use registrar_core::types::{
    ExamType, OfferedCourse, SemesterRegistration, SemesterRegistrationStatus,
};
use registrar_storage::queries::{keyed, records, registrations, semesters};
use registrar_storage::{Database, TxError};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

/// Tuition charged per credit taken.
pub const RATE_PER_CREDIT: i64 = 5000;

/// Exams every enrolled course starts with.
pub const DEFAULT_EXAMS: [ExamType; 2] = [ExamType::Midterm, ExamType::Final];

/// What a rollover created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolloverSummary {
    pub academic_semester_id: String,
    pub confirmed_students: usize,
    pub payments_created: usize,
    pub enrolled_courses_created: usize,
    pub marks_created: usize,
}

/// Full and partial amounts for a credit load.
pub fn tuition(credits: i64) -> (i64, i64) {
    let full = credits * RATE_PER_CREDIT;
    (full, full / 2)
}

/// Make the registration's semester current and materialize payments,
/// enrolled courses and default marks for every confirmed envelope.
///
/// Runs on the caller's transaction so a failure leaves nothing behind.
pub fn roll_over(
    conn: &Connection,
    registration: &SemesterRegistration,
) -> Result<RolloverSummary, TxError> {
    let semester_id = registration.academic_semester_id.as_str();
    semesters::set_current_semester(conn, semester_id)?;

    let envelopes = registrations::confirmed_envelopes(conn, &registration.id)?;
    let mut summary = RolloverSummary {
        academic_semester_id: semester_id.to_string(),
        confirmed_students: envelopes.len(),
        ..Default::default()
    };

    for envelope in &envelopes {
        let student_id = envelope.student_id.as_str();

        if envelope.total_credits_taken > 0
            && records::find_payment(conn, student_id, semester_id)?.is_none()
        {
            let (full, partial) = tuition(envelope.total_credits_taken);
            records::insert_payment(conn, student_id, semester_id, full, partial)?;
            summary.payments_created += 1;
        }

        for selection in registrations::selections_for_student(conn, &registration.id, student_id)? {
            let offered = keyed::require::<OfferedCourse>(conn, &selection.offered_course_id)?;
            if records::find_enrolled_course(conn, student_id, &offered.course_id, semester_id)?
                .is_some()
            {
                debug!(student_id, course_id = %offered.course_id, "course already enrolled");
                continue;
            }
            let enrolled =
                records::insert_enrolled_course(conn, student_id, &offered.course_id, semester_id)?;
            summary.enrolled_courses_created += 1;
            for exam in DEFAULT_EXAMS {
                records::insert_default_mark(conn, &enrolled, exam)?;
                summary.marks_created += 1;
            }
        }
    }

    Ok(summary)
}

/// Run the rollover for an ENDED registration in its own transaction.
///
/// Unlike starting a new semester this may be re-run for the semester that is
/// already current; existing records are left untouched.
pub async fn rollover(
    db: &Database,
    registration_id: &str,
) -> Result<RolloverSummary, RegistrarError> {
    let id = registration_id.to_string();
    let summary = db
        .transaction(move |tx| {
            let registration = keyed::require::<SemesterRegistration>(tx, &id)?;
            if registration.status != SemesterRegistrationStatus::Ended {
                return Err(
                    RegistrarError::bad_request("semester registration is not ended yet").into(),
                );
            }
            roll_over(tx, &registration)
        })
        .await?;

    info!(
        registration_id,
        payments = summary.payments_created,
        enrolled_courses = summary.enrolled_courses_created,
        marks = summary.marks_created,
        "rollover complete"
    );
    Ok(summary)
}
