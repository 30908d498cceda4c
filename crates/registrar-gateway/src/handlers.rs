// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health, academic record and student record handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use registrar_core::types::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, Building, Course, Faculty,
    NewAcademicSemester, NewCourse, NewFaculty, NewStudent, PageRequest, Paginated, Room, Student,
    StudentEnrolledCourse, StudentSemesterPayment,
};
use registrar_storage::KeyedRecord;
use registrar_storage::queries::{academics, courses, facilities, keyed, people, records, semesters};
use serde::{Deserialize, Serialize};

use crate::auth::{AdminUser, Principal, StudentUser};
use crate::error::{ApiError, ApiJson};
use crate::server::GatewayState;

type Created<T> = (StatusCode, Json<T>);

fn created<T>(value: T) -> Created<T> {
    (StatusCode::CREATED, Json(value))
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
    pub uptime_secs: u64,
    pub database: String,
}

/// GET /health
///
/// Liveness plus a round trip through the database connection.
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state
        .db
        .run(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
        .await;
    let (status, code, database) = match database {
        Ok(_) => ("ok", StatusCode::OK, "ok".to_string()),
        Err(e) => ("degraded", StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            name: state.health.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.health.start_time.elapsed().as_secs(),
            database,
        }),
    )
}

/// GET on a record collection, newest first.
pub async fn list_records<R>(
    State(state): State<GatewayState>,
    _principal: Principal,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<R>>, ApiError>
where
    R: KeyedRecord + Serialize,
{
    Ok(Json(keyed::list_page::<R>(&state.db, page).await?))
}

/// GET on one record by id.
pub async fn get_record<R>(
    State(state): State<GatewayState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError>
where
    R: KeyedRecord + Serialize,
{
    Ok(Json(keyed::find_by_id::<R>(&state.db, &id).await?))
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    pub title: String,
    pub academic_faculty_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomRequest {
    pub room_number: String,
    pub floor: String,
    pub building_id: String,
}

fn require_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(registrar_core::RegistrarError::bad_request("title must not be empty").into());
    }
    Ok(())
}

pub async fn create_semester(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<NewAcademicSemester>,
) -> Result<Created<AcademicSemester>, ApiError> {
    Ok(created(semesters::create_semester(&state.db, body).await?))
}

pub async fn create_academic_faculty(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<TitleRequest>,
) -> Result<Created<AcademicFaculty>, ApiError> {
    require_title(&body.title)?;
    Ok(created(academics::create_academic_faculty(&state.db, &body.title).await?))
}

pub async fn create_academic_department(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<DepartmentRequest>,
) -> Result<Created<AcademicDepartment>, ApiError> {
    require_title(&body.title)?;
    let department =
        academics::create_academic_department(&state.db, &body.title, &body.academic_faculty_id)
            .await?;
    Ok(created(department))
}

pub async fn create_building(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<TitleRequest>,
) -> Result<Created<Building>, ApiError> {
    require_title(&body.title)?;
    Ok(created(facilities::create_building(&state.db, &body.title).await?))
}

pub async fn create_room(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<RoomRequest>,
) -> Result<Created<Room>, ApiError> {
    let room =
        facilities::create_room(&state.db, &body.room_number, &body.floor, &body.building_id)
            .await?;
    Ok(created(room))
}

pub async fn create_course(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<NewCourse>,
) -> Result<Created<Course>, ApiError> {
    Ok(created(courses::create_course(&state.db, body).await?))
}

pub async fn create_student(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<NewStudent>,
) -> Result<Created<Student>, ApiError> {
    Ok(created(people::create_student(&state.db, body).await?))
}

pub async fn create_faculty(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<NewFaculty>,
) -> Result<Created<Faculty>, ApiError> {
    Ok(created(people::create_faculty(&state.db, body).await?))
}

/// GET /v1/students/me/enrolled-courses
pub async fn my_enrolled_courses(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
) -> Result<Json<Vec<StudentEnrolledCourse>>, ApiError> {
    Ok(Json(records::enrolled_courses_of(&state.db, &student.user_id).await?))
}

/// GET /v1/students/me/payments
pub async fn my_payments(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
) -> Result<Json<Vec<StudentSemesterPayment>>, ApiError> {
    Ok(Json(records::payments_of(&state.db, &student.user_id).await?))
}
