// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seeded database harness for registration scenarios.

use chrono::NaiveDate;
use registrar_config::model::{GatewayConfig, PrincipalConfig, StorageConfig};
use registrar_config::RegistrarConfig;
use registrar_core::types::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, Building, Course, EnrolledCourseStatus,
    Faculty, NewAcademicSemester, NewCourse, NewFaculty, NewSemesterRegistration, NewStudent,
    OfferedCourse, OfferedCourseSection, Role, Room, SemesterRegistration,
    SemesterRegistrationStatus, SemesterTitle, Student,
};
use registrar_core::{RegistrarError, StorageAdapter};
use registrar_storage::queries::{
    academics, courses, facilities, keyed, offerings, people, records, registrations, semesters,
};
use registrar_storage::{Database, SqliteStorage};
use rusqlite::params;

/// Bearer token of the seeded SUPER_ADMIN principal.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    students: usize,
    current_semester: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            students: 2,
            current_semester: true,
        }
    }

    /// Number of students to seed (default 2).
    pub fn with_students(mut self, count: usize) -> Self {
        self.students = count;
        self
    }

    /// Leave the current-semester singleton empty.
    pub fn without_current_semester(mut self) -> Self {
        self.current_semester = false;
        self
    }

    /// Create the database and seed every record.
    pub async fn build(self) -> Result<TestHarness, RegistrarError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| RegistrarError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();

        let storage_config = StorageConfig {
            database_path: db_path,
            wal_mode: true,
        };
        let storage = SqliteStorage::new(storage_config.clone());
        storage.initialize().await?;
        let db = storage.database()?.clone();

        let academic_faculty = academics::create_academic_faculty(&db, "Faculty of Science").await?;
        let department = academics::create_academic_department(
            &db,
            "Computer Science and Engineering",
            &academic_faculty.id,
        )
        .await?;

        let current_semester =
            semesters::create_semester(&db, semester(2026, SemesterTitle::Autumn)).await?;
        let next_semester =
            semesters::create_semester(&db, semester(2026, SemesterTitle::Fall)).await?;
        if self.current_semester {
            let id = current_semester.id.clone();
            db.run(move |conn| semesters::set_current_semester(conn, &id))
                .await?;
        }

        let building = facilities::create_building(&db, "Academic Building 1").await?;
        let mut rooms = Vec::new();
        for number in ["101", "102"] {
            rooms.push(facilities::create_room(&db, number, "1", &building.id).await?);
        }

        let mut instructors = Vec::new();
        for i in 1..=2 {
            let instructor = people::create_faculty(
                &db,
                NewFaculty {
                    faculty_id: format!("F-{i:04}"),
                    first_name: "Instructor".to_string(),
                    last_name: format!("{i}"),
                    email: format!("instructor{i}@campus.test"),
                    academic_department_id: department.id.clone(),
                    academic_faculty_id: academic_faculty.id.clone(),
                },
            )
            .await?;
            instructors.push(instructor);
        }

        let mut students = Vec::new();
        let mut principals = vec![PrincipalConfig {
            token: ADMIN_TOKEN.to_string(),
            user_id: "admin-1".to_string(),
            role: Role::SuperAdmin,
        }];
        for i in 1..=self.students {
            let student = people::create_student(
                &db,
                NewStudent {
                    student_id: format!("2026{i:06}"),
                    first_name: "Student".to_string(),
                    last_name: format!("{i}"),
                    email: format!("student{i}@campus.test"),
                    academic_department_id: department.id.clone(),
                    academic_faculty_id: academic_faculty.id.clone(),
                },
            )
            .await?;
            principals.push(PrincipalConfig {
                token: TestHarness::student_token(i - 1),
                user_id: student.student_id.clone(),
                role: Role::Student,
            });
            students.push(student);
        }

        let config = RegistrarConfig {
            storage: storage_config,
            gateway: GatewayConfig {
                principals,
                ..GatewayConfig::default()
            },
            ..RegistrarConfig::default()
        };

        tracing::debug!(students = students.len(), "test harness seeded");

        Ok(TestHarness {
            db,
            storage,
            config,
            academic_faculty,
            department,
            current_semester,
            next_semester,
            building,
            rooms,
            instructors,
            students,
            _temp_dir: temp_dir,
        })
    }
}

fn semester(year: i32, title: SemesterTitle) -> NewAcademicSemester {
    NewAcademicSemester {
        year,
        title,
        code: title.code().to_string(),
        start_month: "January".to_string(),
        end_month: "June".to_string(),
    }
}

/// A seeded temp database. Dropping it deletes the database.
pub struct TestHarness {
    pub db: Database,
    /// Storage adapter owning `db`, for health checks and shutdown.
    pub storage: SqliteStorage,
    /// Config pointing at the temp database, with one admin and one principal per student.
    pub config: RegistrarConfig,
    pub academic_faculty: AcademicFaculty,
    pub department: AcademicDepartment,
    /// The semester marked current at seed time.
    pub current_semester: AcademicSemester,
    /// The semester new registrations are opened for.
    pub next_semester: AcademicSemester,
    pub building: Building,
    pub rooms: Vec<Room>,
    pub instructors: Vec<Faculty>,
    pub students: Vec<Student>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Bearer token of the `index`th seeded student.
    pub fn student_token(index: usize) -> String {
        format!("student-token-{}", index + 1)
    }

    pub async fn course(
        &self,
        code: &str,
        credits: i64,
        prerequisites: &[&Course],
    ) -> Result<Course, RegistrarError> {
        courses::create_course(
            &self.db,
            NewCourse {
                title: format!("Course {code}"),
                code: code.to_string(),
                credits,
                prerequisite_ids: prerequisites.iter().map(|c| c.id.clone()).collect(),
            },
        )
        .await
    }

    /// Insert an UPCOMING registration for the next semester, bypassing lifecycle rules.
    pub async fn registration(
        &self,
        min_credit: i64,
        max_credit: i64,
    ) -> Result<SemesterRegistration, RegistrarError> {
        let new = NewSemesterRegistration {
            academic_semester_id: self.next_semester.id.clone(),
            start_date: date(2026, 7, 1),
            end_date: date(2026, 7, 31),
            min_credit,
            max_credit,
        };
        self.db
            .run(move |conn| registrations::insert_registration(conn, &new))
            .await
    }

    /// Force a registration's status, bypassing transition rules.
    pub async fn force_status(
        &self,
        registration_id: &str,
        status: SemesterRegistrationStatus,
    ) -> Result<(), RegistrarError> {
        let id = registration_id.to_string();
        self.db
            .run(move |conn| {
                conn.execute(
                    "UPDATE semester_registrations SET status = ?2 WHERE id = ?1",
                    params![id, status.to_string()],
                )
            })
            .await?;
        Ok(())
    }

    /// Offer `course` under the seeded department.
    pub async fn offer(
        &self,
        course: &Course,
        registration: &SemesterRegistration,
    ) -> Result<OfferedCourse, RegistrarError> {
        let course_id = course.id.clone();
        let department_id = self.department.id.clone();
        let registration_id = registration.id.clone();
        self.db
            .run(move |conn| {
                offerings::offer_course(conn, &course_id, &department_id, &registration_id)?;
                offerings::find_offered_course(conn, &course_id, &department_id, &registration_id)
            })
            .await?
            .ok_or_else(keyed::not_found::<OfferedCourse>)
    }

    pub async fn section(
        &self,
        offered_course: &OfferedCourse,
        title: &str,
        max_capacity: Option<i64>,
    ) -> Result<OfferedCourseSection, RegistrarError> {
        let offered_course = offered_course.clone();
        let title = title.to_string();
        self.db
            .run(move |conn| offerings::insert_section(conn, &title, max_capacity, &offered_course))
            .await
    }

    /// Record `course` as COMPLETED by `student` in the current semester.
    pub async fn complete_course(
        &self,
        student: &Student,
        course: &Course,
    ) -> Result<(), RegistrarError> {
        let student_id = student.id.clone();
        let course_id = course.id.clone();
        let semester_id = self.current_semester.id.clone();
        self.db
            .run(move |conn| {
                let enrolled =
                    records::insert_enrolled_course(conn, &student_id, &course_id, &semester_id)?;
                conn.execute(
                    "UPDATE student_enrolled_courses SET status = ?2 WHERE id = ?1",
                    params![enrolled.id, EnrolledCourseStatus::Completed.to_string()],
                )
            })
            .await?;
        Ok(())
    }

    /// Count rows of `table`.
    pub async fn count(&self, table: &'static str) -> Result<i64, RegistrarError> {
        self.db
            .run(move |conn| {
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            })
            .await
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_seeds_a_current_semester_and_principals() {
        let harness = TestHarness::builder().with_students(3).build().await.unwrap();

        assert_eq!(harness.students.len(), 3);
        assert_eq!(harness.config.gateway.principals.len(), 4);
        let current = semesters::current_semester(&harness.db).await.unwrap().unwrap();
        assert_eq!(current.id, harness.current_semester.id);
        assert_eq!(harness.count("rooms").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn harness_can_skip_the_current_semester() {
        let harness = TestHarness::builder()
            .without_current_semester()
            .build()
            .await
            .unwrap();
        assert!(semesters::current_semester(&harness.db).await.unwrap().is_none());
    }
}
