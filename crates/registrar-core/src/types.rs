// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records and common types shared across Registrar crates.
//!
//! Records mirror the rows held by the storage layer. Enumerations are
//! persisted as their `SCREAMING_SNAKE_CASE` display strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Gateway,
}

// --- Enumerations ---

/// Lifecycle state of a semester registration window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemesterRegistrationStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl SemesterRegistrationStatus {
    /// The only state this one may advance to, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Upcoming => Some(Self::Ongoing),
            Self::Ongoing => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self.next() == Some(next)
    }

    /// UPCOMING and ONGOING registrations count against the single-active rule.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Upcoming | Self::Ongoing)
    }
}

/// Academic semester season. Each title has a fixed two-digit code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemesterTitle {
    Summer,
    Autumn,
    Fall,
}

impl SemesterTitle {
    pub fn code(self) -> &'static str {
        match self {
            Self::Summer => "01",
            Self::Autumn => "02",
            Self::Fall => "03",
        }
    }
}

/// Weekday of a class schedule. Variants are declared in week order, which
/// `Ord` follows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// Status of a permanent enrolled-course record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrolledCourseStatus {
    Ongoing,
    Completed,
    Withdrawn,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamType {
    Midterm,
    Final,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    PartialPaid,
    FullPaid,
}

/// Role carried by an authenticated principal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Faculty,
    Student,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

// --- Pagination ---

/// Page selection for list queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u32 {
        self.page.max(1).saturating_sub(1).saturating_mul(self.limit)
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// A page of records plus the total count matching the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

// --- Collaborator records ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicSemester {
    pub id: String,
    pub year: i32,
    pub title: SemesterTitle,
    pub code: String,
    pub start_month: String,
    pub end_month: String,
    /// Derived from the current-semester singleton, never stored per row.
    pub is_current: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAcademicSemester {
    pub year: i32,
    pub title: SemesterTitle,
    pub code: String,
    pub start_month: String,
    pub end_month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicFaculty {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicDepartment {
    pub id: String,
    pub title: String,
    pub academic_faculty_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub floor: String,
    pub building_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub code: String,
    pub credits: i64,
    /// Courses that must be completed before this one can be taken.
    pub prerequisite_ids: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub code: String,
    pub credits: i64,
    #[serde(default)]
    pub prerequisite_ids: Vec<String>,
}

/// A student. `student_id` is the external user id carried by auth principals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub academic_department_id: String,
    pub academic_faculty_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub academic_department_id: String,
    pub academic_faculty_id: String,
}

/// A faculty member. `faculty_id` is the external user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: String,
    pub faculty_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub academic_department_id: String,
    pub academic_faculty_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFaculty {
    pub faculty_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub academic_department_id: String,
    pub academic_faculty_id: String,
}

// --- Registration records ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterRegistration {
    pub id: String,
    pub academic_semester_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_credit: i64,
    pub max_credit: i64,
    pub status: SemesterRegistrationStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSemesterRegistration {
    pub academic_semester_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_credit: i64,
    pub max_credit: i64,
}

/// Partial update of a semester registration. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemesterRegistrationPatch {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub min_credit: Option<i64>,
    #[serde(default)]
    pub max_credit: Option<i64>,
    #[serde(default)]
    pub status: Option<SemesterRegistrationStatus>,
}

/// Filter for listing semester registrations. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemesterRegistrationFilter {
    #[serde(default)]
    pub academic_semester_id: Option<String>,
    #[serde(default)]
    pub status: Option<SemesterRegistrationStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferedCourse {
    pub id: String,
    pub course_id: String,
    pub academic_department_id: String,
    pub semester_registration_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferedCourseSection {
    pub id: String,
    pub title: String,
    /// `None` means the section has no seat limit.
    pub max_capacity: Option<i64>,
    pub currently_enrolled_student: i64,
    pub offered_course_id: String,
    pub semester_registration_id: String,
    pub created_at: String,
}

impl OfferedCourseSection {
    pub fn is_full(&self) -> bool {
        self.max_capacity
            .is_some_and(|max| self.currently_enrolled_student >= max)
    }
}

/// A weekly class slot. Times are `HH:MM` wall-clock strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSchedule {
    pub id: String,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub offered_course_section_id: String,
    pub semester_registration_id: String,
    pub room_id: String,
    pub faculty_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassSchedule {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub offered_course_section_id: String,
    pub room_id: String,
    pub faculty_id: String,
}

/// A student's enrollment envelope for one semester registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSemesterRegistration {
    pub id: String,
    pub student_id: String,
    pub semester_registration_id: String,
    pub total_credits_taken: i64,
    pub is_confirmed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// One in-progress course selection of a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSemesterRegistrationCourse {
    pub semester_registration_id: String,
    pub student_id: String,
    pub offered_course_id: String,
    pub offered_course_section_id: String,
    pub created_at: String,
}

/// Course selection payload used by enroll and withdraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollCoursePayload {
    pub offered_course_id: String,
    pub offered_course_section_id: String,
}

// --- Materialized records ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentEnrolledCourse {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub academic_semester_id: String,
    pub grade: Option<String>,
    pub point: f64,
    pub total_marks: i64,
    pub status: EnrolledCourseStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentEnrolledCourseMark {
    pub id: String,
    pub student_id: String,
    pub student_enrolled_course_id: String,
    pub academic_semester_id: String,
    pub exam_type: ExamType,
    pub grade: Option<String>,
    pub marks: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSemesterPayment {
    pub id: String,
    pub student_id: String,
    pub academic_semester_id: String,
    pub full_payment_amount: i64,
    pub partial_payment_amount: i64,
    pub total_due_amount: i64,
    pub total_paid_amount: i64,
    pub payment_status: PaymentStatus,
    pub created_at: String,
}
