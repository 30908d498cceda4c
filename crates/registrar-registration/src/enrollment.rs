// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Course enrollment and withdrawal within the ongoing registration.
//!
//! Each call is one immediate transaction: the selection row, the section's
//! seat counter and the envelope's credit total change together or not at all.

use registrar_core::RegistrarError;
use registrar_core::types::{
    Course, EnrollCoursePayload, OfferedCourse, OfferedCourseSection, SemesterRegistration,
    SemesterRegistrationStatus, Student, StudentSemesterRegistration,
    StudentSemesterRegistrationCourse,
};
use registrar_storage::models::now;
use registrar_storage::queries::{keyed, offerings, people, registrations};
use registrar_storage::{Database, TxError};
use rusqlite::Connection;
use tracing::info;

/// Records an enroll or withdraw call resolves before touching anything.
struct Resolved {
    student: Student,
    registration: SemesterRegistration,
    offered_course: OfferedCourse,
    course: Course,
    section: OfferedCourseSection,
    envelope: StudentSemesterRegistration,
}

fn resolve(
    conn: &Connection,
    student_user_id: &str,
    payload: &EnrollCoursePayload,
) -> Result<Resolved, TxError> {
    let student = people::student_by_user_id(conn, student_user_id)?;
    let registration =
        registrations::registration_with_status(conn, SemesterRegistrationStatus::Ongoing)?
            .ok_or_else(|| RegistrarError::not_found("no ongoing semester registration"))?;
    let offered_course = keyed::require::<OfferedCourse>(conn, &payload.offered_course_id)?;
    let course = keyed::require::<Course>(conn, &offered_course.course_id)?;
    let section = keyed::require::<OfferedCourseSection>(conn, &payload.offered_course_section_id)?;

    if offered_course.semester_registration_id != registration.id {
        return Err(RegistrarError::bad_request(
            "offered course does not belong to the ongoing registration",
        )
        .into());
    }
    if section.offered_course_id != offered_course.id {
        return Err(
            RegistrarError::bad_request("section does not belong to the offered course").into(),
        );
    }

    let envelope = registrations::find_envelope(conn, &student.id, &registration.id)?
        .ok_or_else(|| RegistrarError::bad_request("you are not recognized for this semester"))?;

    Ok(Resolved {
        student,
        registration,
        offered_course,
        course,
        section,
        envelope,
    })
}

/// Take a seat in a section of an offered course.
pub async fn enroll(
    db: &Database,
    student_user_id: &str,
    payload: EnrollCoursePayload,
) -> Result<StudentSemesterRegistrationCourse, RegistrarError> {
    let user_id = student_user_id.to_string();
    let selection = db
        .transaction(move |tx| {
            let r = resolve(tx, &user_id, &payload)?;

            if r.section.is_full() {
                return Err(RegistrarError::bad_request("capacity is full").into());
            }
            let already_selected = registrations::selections_for_student(
                tx,
                &r.registration.id,
                &r.student.id,
            )?
            .iter()
            .any(|s| s.offered_course_id == r.offered_course.id);
            if already_selected {
                return Err(
                    RegistrarError::conflict("you are already enrolled in this course").into(),
                );
            }
            if !offerings::take_seat(tx, &r.section.id)? {
                return Err(RegistrarError::bad_request("capacity is full").into());
            }

            let selection = StudentSemesterRegistrationCourse {
                semester_registration_id: r.registration.id.clone(),
                student_id: r.student.id.clone(),
                offered_course_id: r.offered_course.id.clone(),
                offered_course_section_id: r.section.id.clone(),
                created_at: now(),
            };
            registrations::insert_selection(tx, &selection)?;
            registrations::add_credits(tx, &r.envelope.id, r.course.credits)?;
            Ok(selection)
        })
        .await?;

    info!(
        student_id = %selection.student_id,
        offered_course_id = %selection.offered_course_id,
        section_id = %selection.offered_course_section_id,
        "course enrolled"
    );
    Ok(selection)
}

/// Drop a selected course, freeing its seat and credits.
///
/// The seat is released in the section the selection actually holds.
pub async fn withdraw(
    db: &Database,
    student_user_id: &str,
    payload: EnrollCoursePayload,
) -> Result<StudentSemesterRegistration, RegistrarError> {
    let user_id = student_user_id.to_string();
    let (offered_course_id, envelope) = db
        .transaction(move |tx| {
            let r = resolve(tx, &user_id, &payload)?;

            let section_id = registrations::delete_selection(
                tx,
                &r.registration.id,
                &r.student.id,
                &r.offered_course.id,
            )?
            .ok_or_else(|| RegistrarError::not_found("course selection not found"))?;
            offerings::release_seat(tx, &section_id)?;
            registrations::add_credits(tx, &r.envelope.id, -r.course.credits)?;

            let envelope = keyed::require::<StudentSemesterRegistration>(tx, &r.envelope.id)?;
            Ok((r.offered_course.id, envelope))
        })
        .await?;

    info!(
        envelope_id = %envelope.id,
        offered_course_id = %offered_course_id,
        "course withdrawn"
    );
    Ok(envelope)
}
