// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping for the domain records defined in `registrar-core::types`.
//!
//! Each mapper reads columns in the order of the matching `*_COLUMNS`
//! constant, so queries and mappers stay in step.

use std::str::FromStr;

use registrar_core::types::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, Building, ClassSchedule, Course,
    Faculty, OfferedCourse, OfferedCourseSection, Room, SemesterRegistration, Student,
    StudentEnrolledCourse, StudentEnrolledCourseMark, StudentSemesterPayment,
    StudentSemesterRegistration, StudentSemesterRegistrationCourse,
};
use rusqlite::Row;
use rusqlite::types::Type;

/// A new random record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The current UTC time in the format used by every `created_at` column.
pub fn now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Read a text column holding a strum-serialized enum.
pub(crate) fn text_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// A table whose rows map one-to-one onto a record type keyed by `id`.
///
/// Implementors get find-by-id, paged listing and delete through
/// [`crate::queries::keyed`].
pub trait KeyedRecord: Sized + Send + 'static {
    const TABLE: &'static str;
    /// Select list, evaluated with `TABLE` as the only table in scope.
    const COLUMNS: &'static str;
    /// Human-readable name used in not-found messages.
    const LABEL: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl KeyedRecord for AcademicSemester {
    const TABLE: &'static str = "academic_semesters";
    const COLUMNS: &'static str = "id, year, title, code, start_month, end_month,
        EXISTS (SELECT 1 FROM current_academic_semester c
                WHERE c.academic_semester_id = academic_semesters.id),
        created_at";
    const LABEL: &'static str = "academic semester";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            year: row.get(1)?,
            title: text_enum(row, 2)?,
            code: row.get(3)?,
            start_month: row.get(4)?,
            end_month: row.get(5)?,
            is_current: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl KeyedRecord for AcademicFaculty {
    const TABLE: &'static str = "academic_faculties";
    const COLUMNS: &'static str = "id, title, created_at";
    const LABEL: &'static str = "academic faculty";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl KeyedRecord for AcademicDepartment {
    const TABLE: &'static str = "academic_departments";
    const COLUMNS: &'static str = "id, title, academic_faculty_id, created_at";
    const LABEL: &'static str = "academic department";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            academic_faculty_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl KeyedRecord for Building {
    const TABLE: &'static str = "buildings";
    const COLUMNS: &'static str = "id, title, created_at";
    const LABEL: &'static str = "building";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl KeyedRecord for Room {
    const TABLE: &'static str = "rooms";
    const COLUMNS: &'static str = "id, room_number, floor, building_id, created_at";
    const LABEL: &'static str = "room";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            room_number: row.get(1)?,
            floor: row.get(2)?,
            building_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl KeyedRecord for Course {
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static str = "id, title, code, credits,
        (SELECT group_concat(p.prerequisite_id, ',') FROM course_prerequisites p
         WHERE p.course_id = courses.id),
        created_at";
    const LABEL: &'static str = "course";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let prerequisites: Option<String> = row.get(4)?;
        let mut prerequisite_ids: Vec<String> = prerequisites
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        prerequisite_ids.sort();
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            code: row.get(2)?,
            credits: row.get(3)?,
            prerequisite_ids,
            created_at: row.get(5)?,
        })
    }
}

impl KeyedRecord for Student {
    const TABLE: &'static str = "students";
    const COLUMNS: &'static str = "id, student_id, first_name, last_name, email,
        academic_department_id, academic_faculty_id, created_at";
    const LABEL: &'static str = "student";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            email: row.get(4)?,
            academic_department_id: row.get(5)?,
            academic_faculty_id: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl KeyedRecord for Faculty {
    const TABLE: &'static str = "faculties";
    const COLUMNS: &'static str = "id, faculty_id, first_name, last_name, email,
        academic_department_id, academic_faculty_id, created_at";
    const LABEL: &'static str = "faculty";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            faculty_id: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            email: row.get(4)?,
            academic_department_id: row.get(5)?,
            academic_faculty_id: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl KeyedRecord for SemesterRegistration {
    const TABLE: &'static str = "semester_registrations";
    const COLUMNS: &'static str = "id, academic_semester_id, start_date, end_date,
        min_credit, max_credit, status, created_at, updated_at";
    const LABEL: &'static str = "semester registration";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            academic_semester_id: row.get(1)?,
            start_date: row.get(2)?,
            end_date: row.get(3)?,
            min_credit: row.get(4)?,
            max_credit: row.get(5)?,
            status: text_enum(row, 6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl KeyedRecord for OfferedCourse {
    const TABLE: &'static str = "offered_courses";
    const COLUMNS: &'static str =
        "id, course_id, academic_department_id, semester_registration_id, created_at";
    const LABEL: &'static str = "offered course";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            course_id: row.get(1)?,
            academic_department_id: row.get(2)?,
            semester_registration_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl KeyedRecord for OfferedCourseSection {
    const TABLE: &'static str = "offered_course_sections";
    const COLUMNS: &'static str = "id, title, max_capacity, currently_enrolled_student,
        offered_course_id, semester_registration_id, created_at";
    const LABEL: &'static str = "offered course section";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            max_capacity: row.get(2)?,
            currently_enrolled_student: row.get(3)?,
            offered_course_id: row.get(4)?,
            semester_registration_id: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl KeyedRecord for ClassSchedule {
    const TABLE: &'static str = "offered_course_class_schedules";
    const COLUMNS: &'static str = "id, day_of_week, start_time, end_time,
        offered_course_section_id, semester_registration_id, room_id, faculty_id, created_at";
    const LABEL: &'static str = "class schedule";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            day_of_week: text_enum(row, 1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
            offered_course_section_id: row.get(4)?,
            semester_registration_id: row.get(5)?,
            room_id: row.get(6)?,
            faculty_id: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl KeyedRecord for StudentSemesterRegistration {
    const TABLE: &'static str = "student_semester_registrations";
    const COLUMNS: &'static str = "id, student_id, semester_registration_id,
        total_credits_taken, is_confirmed, created_at, updated_at";
    const LABEL: &'static str = "student semester registration";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            semester_registration_id: row.get(2)?,
            total_credits_taken: row.get(3)?,
            is_confirmed: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl KeyedRecord for StudentEnrolledCourse {
    const TABLE: &'static str = "student_enrolled_courses";
    const COLUMNS: &'static str = "id, student_id, course_id, academic_semester_id,
        grade, point, total_marks, status, created_at";
    const LABEL: &'static str = "enrolled course";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            course_id: row.get(2)?,
            academic_semester_id: row.get(3)?,
            grade: row.get(4)?,
            point: row.get(5)?,
            total_marks: row.get(6)?,
            status: text_enum(row, 7)?,
            created_at: row.get(8)?,
        })
    }
}

impl KeyedRecord for StudentEnrolledCourseMark {
    const TABLE: &'static str = "student_enrolled_course_marks";
    const COLUMNS: &'static str = "id, student_id, student_enrolled_course_id,
        academic_semester_id, exam_type, grade, marks, created_at";
    const LABEL: &'static str = "enrolled course mark";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            student_enrolled_course_id: row.get(2)?,
            academic_semester_id: row.get(3)?,
            exam_type: text_enum(row, 4)?,
            grade: row.get(5)?,
            marks: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl KeyedRecord for StudentSemesterPayment {
    const TABLE: &'static str = "student_semester_payments";
    const COLUMNS: &'static str = "id, student_id, academic_semester_id, full_payment_amount,
        partial_payment_amount, total_due_amount, total_paid_amount, payment_status, created_at";
    const LABEL: &'static str = "semester payment";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            academic_semester_id: row.get(2)?,
            full_payment_amount: row.get(3)?,
            partial_payment_amount: row.get(4)?,
            total_due_amount: row.get(5)?,
            total_paid_amount: row.get(6)?,
            payment_status: text_enum(row, 7)?,
            created_at: row.get(8)?,
        })
    }
}

/// Selection rows are keyed by a composite key, so they map outside [`KeyedRecord`].
pub(crate) const SELECTION_COLUMNS: &str = "semester_registration_id, student_id,
    offered_course_id, offered_course_section_id, created_at";

pub(crate) fn selection_from_row(row: &Row<'_>) -> rusqlite::Result<StudentSemesterRegistrationCourse> {
    Ok(StudentSemesterRegistrationCourse {
        semester_registration_id: row.get(0)?,
        student_id: row.get(1)?,
        offered_course_id: row.get(2)?,
        offered_course_section_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}
