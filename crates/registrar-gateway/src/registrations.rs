// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semester registration, offering and enrollment handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use registrar_core::types::{
    ClassSchedule, EnrollCoursePayload, NewClassSchedule, NewSemesterRegistration, OfferedCourse,
    OfferedCourseSection, PageRequest, Paginated, SemesterRegistration,
    SemesterRegistrationFilter, SemesterRegistrationPatch, SemesterRegistrationStatus,
    StudentSemesterRegistration, StudentSemesterRegistrationCourse,
};
use registrar_registration::{
    AvailableCourse, MyRegistration, NewOfferedCourseSection, OfferCoursesRequest,
    RegistrationDetails, RolloverSummary, StartedRegistration, catalog, enrollment, lifecycle,
    scheduling,
};
use serde::{Deserialize, Serialize};

use crate::auth::{AdminUser, Principal, StudentUser};
use crate::error::{ApiError, ApiJson};
use crate::server::GatewayState;

/// Query string of GET /v1/semester-registrations.
///
/// Kept flat: url-encoded queries cannot feed numbers through `serde(flatten)`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub academic_semester_id: Option<String>,
    pub status: Option<SemesterRegistrationStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    fn into_parts(self) -> (SemesterRegistrationFilter, PageRequest) {
        let defaults = PageRequest::default();
        (
            SemesterRegistrationFilter {
                academic_semester_id: self.academic_semester_id,
                status: self.status,
            },
            PageRequest {
                page: self.page.unwrap_or(defaults.page),
                limit: self.limit.unwrap_or(defaults.limit),
            },
        )
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A success message with the affected record's fields alongside it.
#[derive(Debug, Serialize)]
pub struct Acknowledged<T> {
    pub message: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Acknowledged<T> {
    fn new(message: &str, record: T) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
            record,
        })
    }
}

pub async fn create(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<NewSemesterRegistration>,
) -> Result<(StatusCode, Json<SemesterRegistration>), ApiError> {
    let registration = lifecycle::create_registration(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn list(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<SemesterRegistration>>, ApiError> {
    let (filter, page) = query.into_parts();
    Ok(Json(
        lifecycle::list_registrations(&state.db, filter, page).await?,
    ))
}

pub async fn get(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<RegistrationDetails>, ApiError> {
    Ok(Json(lifecycle::get_registration(&state.db, &id).await?))
}

pub async fn update(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<SemesterRegistrationPatch>,
) -> Result<Json<SemesterRegistration>, ApiError> {
    Ok(Json(
        lifecycle::update_registration(&state.db, &id, patch).await?,
    ))
}

pub async fn delete(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    lifecycle::delete_registration(&state.db, &id).await?;
    Ok(Json(MessageResponse {
        message: "semester registration deleted".to_string(),
    }))
}

/// POST /v1/semester-registrations/{id}/start-new-semester
pub async fn start_new_semester(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<RolloverSummary>, ApiError> {
    Ok(Json(lifecycle::start_new_semester(&state.db, &id).await?))
}

pub async fn start_my_registration(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
) -> Result<Json<StartedRegistration>, ApiError> {
    Ok(Json(
        lifecycle::start_my_registration(&state.db, &student.user_id).await?,
    ))
}

pub async fn my_registration(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
) -> Result<Json<MyRegistration>, ApiError> {
    Ok(Json(
        lifecycle::my_registration(&state.db, &student.user_id).await?,
    ))
}

pub async fn my_available_courses(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
) -> Result<Json<Vec<AvailableCourse>>, ApiError> {
    Ok(Json(
        catalog::available_courses(&state.db, &student.user_id).await?,
    ))
}

pub async fn enroll(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
    ApiJson(body): ApiJson<EnrollCoursePayload>,
) -> Result<Json<Acknowledged<StudentSemesterRegistrationCourse>>, ApiError> {
    let selection = enrollment::enroll(&state.db, &student.user_id, body).await?;
    Ok(Acknowledged::new("successfully enrolled into course", selection))
}

pub async fn withdraw(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
    ApiJson(body): ApiJson<EnrollCoursePayload>,
) -> Result<Json<Acknowledged<StudentSemesterRegistration>>, ApiError> {
    let envelope = enrollment::withdraw(&state.db, &student.user_id, body).await?;
    Ok(Acknowledged::new("successfully withdrawn from course", envelope))
}

pub async fn confirm_my_registration(
    State(state): State<GatewayState>,
    StudentUser(student): StudentUser,
) -> Result<Json<Acknowledged<StudentSemesterRegistration>>, ApiError> {
    let envelope = lifecycle::confirm_my_registration(&state.db, &student.user_id).await?;
    Ok(Acknowledged::new("your registration is confirmed", envelope))
}

pub async fn offer_courses(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<OfferCoursesRequest>,
) -> Result<(StatusCode, Json<Vec<OfferedCourse>>), ApiError> {
    let offered = catalog::offer_courses(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(offered)))
}

pub async fn create_section(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<NewOfferedCourseSection>,
) -> Result<(StatusCode, Json<OfferedCourseSection>), ApiError> {
    let section = catalog::create_section(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

pub async fn create_schedule(
    State(state): State<GatewayState>,
    _admin: AdminUser,
    ApiJson(body): ApiJson<NewClassSchedule>,
) -> Result<(StatusCode, Json<ClassSchedule>), ApiError> {
    let schedule = scheduling::create_schedule(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// GET /v1/offered-course-sections/{id}/class-schedules
pub async fn list_section_schedules(
    State(state): State<GatewayState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<Vec<ClassSchedule>>, ApiError> {
    Ok(Json(scheduling::list_for_section(&state.db, &id).await?))
}
