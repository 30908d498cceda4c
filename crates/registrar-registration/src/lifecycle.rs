// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semester registration lifecycle: UPCOMING -> ONGOING -> ENDED.
//!
//! At most one registration is UPCOMING or ONGOING at a time. Students open
//! their envelope once the window is ONGOING and confirm it when their credit
//! load is within the registration's bounds.

use chrono::NaiveDate;
use registrar_core::RegistrarError;
use registrar_core::types::{
    AcademicSemester, NewSemesterRegistration, PageRequest, Paginated, SemesterRegistration,
    SemesterRegistrationFilter, SemesterRegistrationPatch, SemesterRegistrationStatus,
    StudentSemesterRegistration,
};
use registrar_storage::queries::{keyed, people, registrations, semesters};
use registrar_storage::Database;
use serde::Serialize;
use tracing::info;

use crate::rollover::{self, RolloverSummary};

/// A registration together with the semester it opens.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationDetails {
    #[serde(flatten)]
    pub registration: SemesterRegistration,
    pub academic_semester: AcademicSemester,
}

/// The ongoing registration and the caller's envelope in it.
#[derive(Debug, Clone, Serialize)]
pub struct MyRegistration {
    pub semester_registration: Option<SemesterRegistration>,
    pub student_semester_registration: Option<StudentSemesterRegistration>,
}

/// Result of opening a student's envelope.
#[derive(Debug, Clone, Serialize)]
pub struct StartedRegistration {
    pub semester_registration: SemesterRegistration,
    pub student_semester_registration: StudentSemesterRegistration,
}

fn validate_bounds(
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_credit: i64,
    max_credit: i64,
) -> Result<(), RegistrarError> {
    if min_credit < 0 {
        return Err(RegistrarError::bad_request("credit bounds must not be negative"));
    }
    if min_credit > max_credit {
        return Err(RegistrarError::bad_request(
            "minimum credit cannot exceed maximum credit",
        ));
    }
    if start_date > end_date {
        return Err(RegistrarError::bad_request(
            "start date cannot be after end date",
        ));
    }
    Ok(())
}

fn check_transition(
    from: SemesterRegistrationStatus,
    to: SemesterRegistrationStatus,
) -> Result<(), RegistrarError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(RegistrarError::InvalidTransition { from, to })
    }
}

/// Open a new registration window as UPCOMING.
pub async fn create_registration(
    db: &Database,
    new: NewSemesterRegistration,
) -> Result<SemesterRegistration, RegistrarError> {
    validate_bounds(new.start_date, new.end_date, new.min_credit, new.max_credit)?;

    let registration = db
        .transaction(move |tx| {
            keyed::require::<AcademicSemester>(tx, &new.academic_semester_id)?;
            if let Some(active) = registrations::active_registration(tx)? {
                return Err(RegistrarError::conflict(format!(
                    "there is already an {} registration",
                    active.status
                ))
                .into());
            }
            Ok(registrations::insert_registration(tx, &new)?)
        })
        .await?;

    info!(
        registration_id = %registration.id,
        semester_id = %registration.academic_semester_id,
        "semester registration created"
    );
    Ok(registration)
}

pub async fn get_registration(
    db: &Database,
    id: &str,
) -> Result<RegistrationDetails, RegistrarError> {
    let id = id.to_string();
    db.transaction(move |tx| {
        let registration = keyed::require::<SemesterRegistration>(tx, &id)?;
        let academic_semester =
            keyed::require::<AcademicSemester>(tx, &registration.academic_semester_id)?;
        Ok(RegistrationDetails {
            registration,
            academic_semester,
        })
    })
    .await
}

pub async fn list_registrations(
    db: &Database,
    filter: SemesterRegistrationFilter,
    page: PageRequest,
) -> Result<Paginated<SemesterRegistration>, RegistrarError> {
    db.run(move |conn| registrations::list_registrations(conn, &filter, page))
        .await
}

/// Apply a partial update. Dates and credit bounds get the same checks as
/// creation; a status change must be the next step of the lifecycle.
pub async fn update_registration(
    db: &Database,
    id: &str,
    patch: SemesterRegistrationPatch,
) -> Result<SemesterRegistration, RegistrarError> {
    let id = id.to_string();
    let updated = db
        .transaction(move |tx| {
            let mut registration = keyed::require::<SemesterRegistration>(tx, &id)?;
            let previous = registration.status;

            registration.start_date = patch.start_date.unwrap_or(registration.start_date);
            registration.end_date = patch.end_date.unwrap_or(registration.end_date);
            registration.min_credit = patch.min_credit.unwrap_or(registration.min_credit);
            registration.max_credit = patch.max_credit.unwrap_or(registration.max_credit);
            validate_bounds(
                registration.start_date,
                registration.end_date,
                registration.min_credit,
                registration.max_credit,
            )?;

            if let Some(status) = patch.status {
                check_transition(previous, status)?;
                registration.status = status;
            }

            registrations::update_registration(tx, &registration)?;
            let updated = keyed::require::<SemesterRegistration>(tx, &id)?;
            Ok((previous, updated))
        })
        .await;

    let (previous, registration) = updated?;
    if previous != registration.status {
        info!(
            registration_id = %registration.id,
            from = %previous,
            to = %registration.status,
            "semester registration status changed"
        );
    }
    Ok(registration)
}

/// Advance a registration to `status`.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: SemesterRegistrationStatus,
) -> Result<SemesterRegistration, RegistrarError> {
    update_registration(
        db,
        id,
        SemesterRegistrationPatch {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

/// Delete a registration with its offerings, envelopes and selections.
pub async fn delete_registration(db: &Database, id: &str) -> Result<(), RegistrarError> {
    keyed::delete_by_id::<SemesterRegistration>(db, id).await?;
    info!(registration_id = %id, "semester registration deleted");
    Ok(())
}

/// Open (or return) the caller's envelope in the ongoing registration.
pub async fn start_my_registration(
    db: &Database,
    student_user_id: &str,
) -> Result<StartedRegistration, RegistrarError> {
    let user_id = student_user_id.to_string();
    db.transaction(move |tx| {
        let student = people::student_by_user_id(tx, &user_id)?;
        let registration = registrations::active_registration(tx)?
            .ok_or_else(|| RegistrarError::not_found("no active semester registration"))?;
        if registration.status == SemesterRegistrationStatus::Upcoming {
            return Err(RegistrarError::bad_request("registration is not started yet").into());
        }
        let envelope = registrations::ensure_envelope(tx, &student.id, &registration.id)?;
        Ok(StartedRegistration {
            semester_registration: registration,
            student_semester_registration: envelope,
        })
    })
    .await
}

pub async fn my_registration(
    db: &Database,
    student_user_id: &str,
) -> Result<MyRegistration, RegistrarError> {
    let user_id = student_user_id.to_string();
    db.transaction(move |tx| {
        let student = people::student_by_user_id(tx, &user_id)?;
        let registration =
            registrations::registration_with_status(tx, SemesterRegistrationStatus::Ongoing)?;
        let envelope = match &registration {
            Some(registration) => registrations::find_envelope(tx, &student.id, &registration.id)?,
            None => None,
        };
        Ok(MyRegistration {
            semester_registration: registration,
            student_semester_registration: envelope,
        })
    })
    .await
}

/// Lock in the caller's course selection for the ongoing registration.
pub async fn confirm_my_registration(
    db: &Database,
    student_user_id: &str,
) -> Result<StudentSemesterRegistration, RegistrarError> {
    let user_id = student_user_id.to_string();
    let envelope = db
        .transaction(move |tx| {
            let student = people::student_by_user_id(tx, &user_id)?;
            let registration =
                registrations::registration_with_status(tx, SemesterRegistrationStatus::Ongoing)?
                    .ok_or_else(|| RegistrarError::not_found("no ongoing semester registration"))?;
            let envelope = registrations::find_envelope(tx, &student.id, &registration.id)?
                .ok_or_else(|| {
                    RegistrarError::bad_request("you are not recognized for this semester")
                })?;

            let credits = envelope.total_credits_taken;
            if credits == 0 {
                return Err(RegistrarError::bad_request("you are not enrolled in any course").into());
            }
            if credits < registration.min_credit || credits > registration.max_credit {
                return Err(RegistrarError::bad_request(format!(
                    "you can take only {} to {} credits",
                    registration.min_credit, registration.max_credit
                ))
                .into());
            }

            registrations::confirm_envelope(tx, &envelope.id)?;
            keyed::require::<StudentSemesterRegistration>(tx, &envelope.id)
        })
        .await?;

    info!(
        envelope_id = %envelope.id,
        credits = envelope.total_credits_taken,
        "student registration confirmed"
    );
    Ok(envelope)
}

/// Activate the semester of an ENDED registration and materialize its records.
pub async fn start_new_semester(
    db: &Database,
    registration_id: &str,
) -> Result<RolloverSummary, RegistrarError> {
    let id = registration_id.to_string();
    let summary = db
        .transaction(move |tx| {
            let registration = keyed::require::<SemesterRegistration>(tx, &id)?;
            if registration.status != SemesterRegistrationStatus::Ended {
                return Err(RegistrarError::bad_request("semester registration is not ended yet").into());
            }
            if semesters::current_semester_id(tx)?.as_deref()
                == Some(registration.academic_semester_id.as_str())
            {
                return Err(RegistrarError::bad_request("semester is already started").into());
            }
            rollover::roll_over(tx, &registration)
        })
        .await?;

    info!(
        registration_id = %registration_id,
        semester_id = %summary.academic_semester_id,
        payments = summary.payments_created,
        enrolled_courses = summary.enrolled_courses_created,
        "new semester started"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use registrar_core::types::SemesterRegistrationStatus::*;
    use registrar_test_utils::TestHarness;

    use super::*;

    fn new_registration(harness: &TestHarness, min: i64, max: i64) -> NewSemesterRegistration {
        NewSemesterRegistration {
            academic_semester_id: harness.next_semester.id.clone(),
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            min_credit: min,
            max_credit: max,
        }
    }

    #[tokio::test]
    async fn second_active_registration_is_a_conflict() {
        let harness = TestHarness::builder().build().await.unwrap();
        let first = create_registration(&harness.db, new_registration(&harness, 6, 18))
            .await
            .unwrap();
        assert_eq!(first.status, Upcoming);

        let err = create_registration(&harness.db, new_registration(&harness, 6, 18))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::Conflict(_)), "got {err:?}");

        update_status(&harness.db, &first.id, Ongoing).await.unwrap();
        let err = create_registration(&harness.db, new_registration(&harness, 6, 18))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::Conflict(_)));

        update_status(&harness.db, &first.id, Ended).await.unwrap();
        create_registration(&harness.db, new_registration(&harness, 6, 18))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn invalid_bounds_and_unknown_semester_are_rejected() {
        let harness = TestHarness::builder().build().await.unwrap();

        let err = create_registration(&harness.db, new_registration(&harness, 20, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::BadRequest(_)));

        let mut inverted = new_registration(&harness, 6, 18);
        inverted.end_date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let err = create_registration(&harness.db, inverted).await.unwrap_err();
        assert!(matches!(err, RegistrarError::BadRequest(_)));

        let mut unknown = new_registration(&harness, 6, 18);
        unknown.academic_semester_id = "missing".to_string();
        let err = create_registration(&harness.db, unknown).await.unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_only_moves_forward_one_step() {
        let harness = TestHarness::builder().build().await.unwrap();
        let registration = create_registration(&harness.db, new_registration(&harness, 6, 18))
            .await
            .unwrap();

        let err = update_status(&harness.db, &registration.id, Ended)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrarError::InvalidTransition {
                from: Upcoming,
                to: Ended
            }
        ));

        update_status(&harness.db, &registration.id, Ongoing).await.unwrap();
        let err = update_status(&harness.db, &registration.id, Upcoming)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::InvalidTransition { .. }));

        update_status(&harness.db, &registration.id, Ended).await.unwrap();
        let err = update_status(&harness.db, &registration.id, Ongoing)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::InvalidTransition { .. }));

        let err = update_status(&harness.db, "missing", Ongoing).await.unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));
    }

    #[tokio::test]
    async fn patch_updates_details_and_revalidates() {
        let harness = TestHarness::builder().build().await.unwrap();
        let registration = create_registration(&harness.db, new_registration(&harness, 6, 18))
            .await
            .unwrap();

        let updated = update_registration(
            &harness.db,
            &registration.id,
            SemesterRegistrationPatch {
                max_credit: Some(21),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.max_credit, 21);
        assert_eq!(updated.min_credit, 6);
        assert_eq!(updated.status, Upcoming);

        let err = update_registration(
            &harness.db,
            &registration.id,
            SemesterRegistrationPatch {
                min_credit: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RegistrarError::BadRequest(_)));

        let details = get_registration(&harness.db, &registration.id).await.unwrap();
        assert_eq!(details.registration.max_credit, 21);
        assert_eq!(details.academic_semester.id, harness.next_semester.id);
    }

    #[tokio::test]
    async fn start_my_registration_requires_an_ongoing_window() {
        let harness = TestHarness::builder().build().await.unwrap();
        let student = &harness.students[0].student_id;

        let err = start_my_registration(&harness.db, student).await.unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));

        let registration = harness.registration(6, 18).await.unwrap();
        let err = start_my_registration(&harness.db, student).await.unwrap_err();
        assert_eq!(err.to_string(), "registration is not started yet");

        harness.force_status(&registration.id, Ongoing).await.unwrap();
        let first = start_my_registration(&harness.db, student).await.unwrap();
        let second = start_my_registration(&harness.db, student).await.unwrap();
        assert_eq!(
            first.student_semester_registration.id,
            second.student_semester_registration.id
        );
        assert_eq!(harness.count("student_semester_registrations").await.unwrap(), 1);

        let err = start_my_registration(&harness.db, "nobody").await.unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));
    }

    #[tokio::test]
    async fn my_registration_reports_missing_pieces_as_none() {
        let harness = TestHarness::builder().build().await.unwrap();
        let student = &harness.students[0].student_id;

        let mine = my_registration(&harness.db, student).await.unwrap();
        assert!(mine.semester_registration.is_none());

        let registration = harness.registration(6, 18).await.unwrap();
        harness.force_status(&registration.id, Ongoing).await.unwrap();
        let mine = my_registration(&harness.db, student).await.unwrap();
        assert!(mine.semester_registration.is_some());
        assert!(mine.student_semester_registration.is_none());
    }

    #[tokio::test]
    async fn confirm_without_envelope_or_courses_is_rejected() {
        let harness = TestHarness::builder().build().await.unwrap();
        let student = &harness.students[0].student_id;
        let registration = harness.registration(6, 18).await.unwrap();
        harness.force_status(&registration.id, Ongoing).await.unwrap();

        let err = confirm_my_registration(&harness.db, student).await.unwrap_err();
        assert_eq!(err.to_string(), "you are not recognized for this semester");

        start_my_registration(&harness.db, student).await.unwrap();
        let err = confirm_my_registration(&harness.db, student).await.unwrap_err();
        assert_eq!(err.to_string(), "you are not enrolled in any course");
    }

    #[tokio::test]
    async fn deleting_a_registration_removes_its_envelopes() {
        let harness = TestHarness::builder().build().await.unwrap();
        let registration = harness.registration(6, 18).await.unwrap();
        harness.force_status(&registration.id, Ongoing).await.unwrap();
        start_my_registration(&harness.db, &harness.students[0].student_id)
            .await
            .unwrap();

        delete_registration(&harness.db, &registration.id).await.unwrap();
        assert_eq!(harness.count("student_semester_registrations").await.unwrap(), 0);
        let err = get_registration(&harness.db, &registration.id).await.unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));
    }

    #[tokio::test]
    async fn start_new_semester_requires_an_ended_registration() {
        let harness = TestHarness::builder().build().await.unwrap();
        let registration = harness.registration(6, 18).await.unwrap();

        let err = start_new_semester(&harness.db, &registration.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::BadRequest(_)));

        harness.force_status(&registration.id, Ended).await.unwrap();
        let summary = start_new_semester(&harness.db, &registration.id).await.unwrap();
        assert_eq!(summary.academic_semester_id, harness.next_semester.id);

        let err = start_new_semester(&harness.db, &registration.id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "semester is already started");

        let err = start_new_semester(&harness.db, "missing").await.unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));
    }
}
