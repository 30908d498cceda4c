// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use registrar_core::types::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, Building, ClassSchedule, Course,
    Faculty, OfferedCourse, OfferedCourseSection, Room, Student,
};
use registrar_core::RegistrarError;
use registrar_storage::Database;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;
use crate::registrations;

/// Health state for the unauthenticated health endpoint.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Instance name reported by `/health`.
    pub name: String,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub db: Database,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Build the full route table.
///
/// `/health` is public; every `/v1` route requires a bearer token, and
/// handlers narrow the allowed roles through their extractors.
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let registration_routes = Router::new()
        .route(
            "/v1/semester-registrations",
            post(registrations::create).get(registrations::list),
        )
        .route(
            "/v1/semester-registrations/start-registration",
            post(registrations::start_my_registration),
        )
        .route(
            "/v1/semester-registrations/my-registration",
            get(registrations::my_registration),
        )
        .route(
            "/v1/semester-registrations/my-available-courses",
            get(registrations::my_available_courses),
        )
        .route(
            "/v1/semester-registrations/enroll-into-course",
            post(registrations::enroll),
        )
        .route(
            "/v1/semester-registrations/withdraw-from-course",
            post(registrations::withdraw),
        )
        .route(
            "/v1/semester-registrations/confirm-my-registration",
            post(registrations::confirm_my_registration),
        )
        .route(
            "/v1/semester-registrations/{id}",
            get(registrations::get)
                .patch(registrations::update)
                .delete(registrations::delete),
        )
        .route(
            "/v1/semester-registrations/{id}/start-new-semester",
            post(registrations::start_new_semester),
        )
        .route(
            "/v1/offered-courses",
            post(registrations::offer_courses).get(handlers::list_records::<OfferedCourse>),
        )
        .route(
            "/v1/offered-courses/{id}",
            get(handlers::get_record::<OfferedCourse>),
        )
        .route(
            "/v1/offered-course-sections",
            post(registrations::create_section)
                .get(handlers::list_records::<OfferedCourseSection>),
        )
        .route(
            "/v1/offered-course-sections/{id}",
            get(handlers::get_record::<OfferedCourseSection>),
        )
        .route(
            "/v1/offered-course-sections/{id}/class-schedules",
            get(registrations::list_section_schedules),
        )
        .route(
            "/v1/offered-course-class-schedules",
            post(registrations::create_schedule).get(handlers::list_records::<ClassSchedule>),
        );

    let record_routes = Router::new()
        .route(
            "/v1/academic-semesters",
            post(handlers::create_semester).get(handlers::list_records::<AcademicSemester>),
        )
        .route(
            "/v1/academic-semesters/{id}",
            get(handlers::get_record::<AcademicSemester>),
        )
        .route(
            "/v1/academic-faculties",
            post(handlers::create_academic_faculty)
                .get(handlers::list_records::<AcademicFaculty>),
        )
        .route(
            "/v1/academic-departments",
            post(handlers::create_academic_department)
                .get(handlers::list_records::<AcademicDepartment>),
        )
        .route(
            "/v1/buildings",
            post(handlers::create_building).get(handlers::list_records::<Building>),
        )
        .route(
            "/v1/rooms",
            post(handlers::create_room).get(handlers::list_records::<Room>),
        )
        .route(
            "/v1/courses",
            post(handlers::create_course).get(handlers::list_records::<Course>),
        )
        .route("/v1/courses/{id}", get(handlers::get_record::<Course>))
        .route(
            "/v1/students",
            post(handlers::create_student).get(handlers::list_records::<Student>),
        )
        .route(
            "/v1/students/me/enrolled-courses",
            get(handlers::my_enrolled_courses),
        )
        .route("/v1/students/me/payments", get(handlers::my_payments))
        .route(
            "/v1/faculties",
            post(handlers::create_faculty).get(handlers::list_records::<Faculty>),
        );

    let api_routes = Router::new()
        .merge(registration_routes)
        .merge(record_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind the listener for `host:port`.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, RegistrarError> {
    let addr = format!("{host}:{port}");
    TcpListener::bind(&addr)
        .await
        .map_err(|e| RegistrarError::Internal(format!("failed to bind gateway to {addr}: {e}")))
}

/// Serve the gateway on an already bound listener until the task is aborted.
pub async fn serve(listener: TcpListener, state: GatewayState) -> Result<(), RegistrarError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "gateway server listening");
    }
    axum::serve(listener, router(state))
        .await
        .map_err(|e| RegistrarError::Internal(format!("gateway server error: {e}")))
}
