// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offering courses for a registration and listing what a student may take.

use registrar_core::RegistrarError;
use registrar_core::types::{
    AcademicDepartment, ClassSchedule, Course, OfferedCourse, OfferedCourseSection,
    SemesterRegistration,
};
use registrar_storage::Database;
use registrar_storage::queries::{keyed, offerings, people, records, registrations, schedules};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferCoursesRequest {
    pub academic_department_id: String,
    pub semester_registration_id: String,
    pub course_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOfferedCourseSection {
    pub title: String,
    #[serde(default)]
    pub max_capacity: Option<i64>,
    pub offered_course_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionWithSchedules {
    #[serde(flatten)]
    pub section: OfferedCourseSection,
    pub schedules: Vec<ClassSchedule>,
}

/// An offered course a student is eligible for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableCourse {
    #[serde(flatten)]
    pub offered_course: OfferedCourse,
    pub course: Course,
    /// Whether the student already selected this course in the registration.
    pub is_taken: bool,
    pub sections: Vec<SectionWithSchedules>,
}

/// Offer courses under a department for a registration.
///
/// Courses already offered are left as they are; the result lists every
/// requested offering.
pub async fn offer_courses(
    db: &Database,
    request: OfferCoursesRequest,
) -> Result<Vec<OfferedCourse>, RegistrarError> {
    if request.course_ids.is_empty() {
        return Err(RegistrarError::bad_request("course_ids must not be empty"));
    }

    let (offered, created) = db
        .transaction(move |tx| {
            let department =
                keyed::require::<AcademicDepartment>(tx, &request.academic_department_id)?;
            let registration =
                keyed::require::<SemesterRegistration>(tx, &request.semester_registration_id)?;

            let mut offered = Vec::with_capacity(request.course_ids.len());
            let mut created = 0usize;
            for course_id in &request.course_ids {
                keyed::require::<Course>(tx, course_id)?;
                if offerings::offer_course(tx, course_id, &department.id, &registration.id)? {
                    created += 1;
                }
                let record =
                    offerings::find_offered_course(tx, course_id, &department.id, &registration.id)?
                        .ok_or_else(keyed::not_found::<OfferedCourse>)?;
                if !offered.iter().any(|o: &OfferedCourse| o.id == record.id) {
                    offered.push(record);
                }
            }
            Ok((offered, created))
        })
        .await?;

    info!(offered = offered.len(), created, "courses offered");
    Ok(offered)
}

pub async fn create_section(
    db: &Database,
    new: NewOfferedCourseSection,
) -> Result<OfferedCourseSection, RegistrarError> {
    if new.title.trim().is_empty() {
        return Err(RegistrarError::bad_request("section title must not be empty"));
    }
    if let Some(capacity) = new.max_capacity
        && capacity < 0
    {
        return Err(RegistrarError::bad_request("max_capacity must not be negative"));
    }

    let section = db
        .transaction(move |tx| {
            let offered = keyed::require::<OfferedCourse>(tx, &new.offered_course_id)?;
            Ok(offerings::insert_section(tx, &new.title, new.max_capacity, &offered)?)
        })
        .await?;

    info!(section_id = %section.id, offered_course_id = %section.offered_course_id, "section created");
    Ok(section)
}

/// Courses of the student's department in the active registration that the
/// student has not completed and whose prerequisites are all completed.
pub async fn available_courses(
    db: &Database,
    student_user_id: &str,
) -> Result<Vec<AvailableCourse>, RegistrarError> {
    let user_id = student_user_id.to_string();
    db.transaction(move |tx| {
        let student = people::student_by_user_id(tx, &user_id)?;
        let registration = registrations::active_registration(tx)?
            .ok_or_else(|| RegistrarError::not_found("no active semester registration"))?;

        let completed = records::completed_course_ids(tx, &student.id)?;
        let taken = registrations::selections_for_student(tx, &registration.id, &student.id)?;

        let mut available = Vec::new();
        for offered_course in offerings::offered_courses_for_department(
            tx,
            &registration.id,
            &student.academic_department_id,
        )? {
            let course = keyed::require::<Course>(tx, &offered_course.course_id)?;
            if completed.contains(&course.id)
                || !course.prerequisite_ids.iter().all(|p| completed.contains(p))
            {
                continue;
            }

            let sections = offerings::sections_for_offered_course(tx, &offered_course.id)?
                .into_iter()
                .map(|section| {
                    let schedules = schedules::schedules_for_section(tx, &section.id)?;
                    Ok(SectionWithSchedules { section, schedules })
                })
                .collect::<rusqlite::Result<Vec<_>>>()?;

            available.push(AvailableCourse {
                is_taken: taken.iter().any(|s| s.offered_course_id == offered_course.id),
                offered_course,
                course,
                sections,
            });
        }
        Ok(available)
    })
    .await
}

#[cfg(test)]
mod tests {
    use registrar_core::types::{EnrollCoursePayload, SemesterRegistrationStatus::*};
    use registrar_test_utils::TestHarness;

    use super::*;
    use crate::{enrollment, lifecycle};

    #[tokio::test]
    async fn offering_is_idempotent_per_triple() {
        let harness = TestHarness::builder().build().await.unwrap();
        let registration = harness.registration(3, 18).await.unwrap();
        let a = harness.course("CSE-101", 3, &[]).await.unwrap();
        let b = harness.course("CSE-102", 3, &[]).await.unwrap();
        let request = OfferCoursesRequest {
            academic_department_id: harness.department.id.clone(),
            semester_registration_id: registration.id.clone(),
            course_ids: vec![a.id.clone(), b.id.clone()],
        };

        let first = offer_courses(&harness.db, request.clone()).await.unwrap();
        let second = offer_courses(&harness.db, request).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(harness.count("offered_courses").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn offering_unknown_records_fails_atomically() {
        let harness = TestHarness::builder().build().await.unwrap();
        let registration = harness.registration(3, 18).await.unwrap();
        let a = harness.course("CSE-101", 3, &[]).await.unwrap();

        let err = offer_courses(
            &harness.db,
            OfferCoursesRequest {
                academic_department_id: harness.department.id.clone(),
                semester_registration_id: registration.id.clone(),
                course_ids: vec![a.id.clone(), "missing".to_string()],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));
        assert_eq!(harness.count("offered_courses").await.unwrap(), 0);

        let err = offer_courses(
            &harness.db,
            OfferCoursesRequest {
                academic_department_id: harness.department.id.clone(),
                semester_registration_id: registration.id.clone(),
                course_ids: Vec::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RegistrarError::BadRequest(_)));
    }

    #[tokio::test]
    async fn sections_inherit_the_registration() {
        let harness = TestHarness::builder().build().await.unwrap();
        let registration = harness.registration(3, 18).await.unwrap();
        let course = harness.course("CSE-101", 3, &[]).await.unwrap();
        let offered = harness.offer(&course, &registration).await.unwrap();

        let section = create_section(
            &harness.db,
            NewOfferedCourseSection {
                title: "A".to_string(),
                max_capacity: Some(30),
                offered_course_id: offered.id.clone(),
            },
        )
        .await
        .unwrap();
        assert_eq!(section.semester_registration_id, registration.id);
        assert_eq!(section.currently_enrolled_student, 0);

        let err = create_section(
            &harness.db,
            NewOfferedCourseSection {
                title: "B".to_string(),
                max_capacity: Some(-1),
                offered_course_id: offered.id.clone(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RegistrarError::BadRequest(_)));
    }

    #[tokio::test]
    async fn available_courses_respect_prerequisites_and_completion() {
        let harness = TestHarness::builder().with_students(1).build().await.unwrap();
        let student = harness.students[0].clone();
        let registration = harness.registration(3, 18).await.unwrap();

        let intro = harness.course("CSE-101", 3, &[]).await.unwrap();
        let structures = harness.course("CSE-201", 3, &[&intro]).await.unwrap();
        let compilers = harness.course("CSE-401", 3, &[&structures]).await.unwrap();
        let ethics = harness.course("HUM-101", 2, &[]).await.unwrap();
        harness.complete_course(&student, &intro).await.unwrap();

        let mut sections = Vec::new();
        for course in [&intro, &structures, &compilers, &ethics] {
            let offered = harness.offer(course, &registration).await.unwrap();
            sections.push((
                offered.clone(),
                harness.section(&offered, "A", Some(10)).await.unwrap(),
            ));
        }

        let available = available_courses(&harness.db, &student.student_id).await.unwrap();
        let mut codes: Vec<&str> = available.iter().map(|a| a.course.code.as_str()).collect();
        codes.sort_unstable();
        assert_eq!(codes, vec!["CSE-201", "HUM-101"]);
        assert!(available.iter().all(|a| !a.is_taken && a.sections.len() == 1));

        harness.force_status(&registration.id, Ongoing).await.unwrap();
        lifecycle::start_my_registration(&harness.db, &student.student_id)
            .await
            .unwrap();
        let (offered, section) = &sections[3];
        enrollment::enroll(
            &harness.db,
            &student.student_id,
            EnrollCoursePayload {
                offered_course_id: offered.id.clone(),
                offered_course_section_id: section.id.clone(),
            },
        )
        .await
        .unwrap();

        let available = available_courses(&harness.db, &student.student_id).await.unwrap();
        let ethics_entry = available
            .iter()
            .find(|a| a.course.id == ethics.id)
            .unwrap();
        assert!(ethics_entry.is_taken);
    }

    #[tokio::test]
    async fn available_courses_need_an_active_registration() {
        let harness = TestHarness::builder().build().await.unwrap();
        let err = available_courses(&harness.db, &harness.students[0].student_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));
    }
}
