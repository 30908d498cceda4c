// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driving the gateway with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use registrar_gateway::{GatewayServer, router};
use registrar_test_utils::{ADMIN_TOKEN, TestHarness};
use serde_json::{Value, json};
use tower::ServiceExt;

struct Api {
    harness: TestHarness,
    app: Router,
}

impl Api {
    async fn new() -> Self {
        let harness = TestHarness::builder().build().await.unwrap();
        let server = GatewayServer::new(
            "registrar-test",
            harness.config.gateway.clone(),
            harness.db.clone(),
        );
        let app = router(server.state());
        Self { harness, app }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call(method, uri, Some(ADMIN_TOKEN), body).await
    }

    async fn student(
        &self,
        index: usize,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let token = TestHarness::student_token(index);
        self.call(method, uri, Some(&token), body).await
    }

    fn registration_body(&self, min: i64, max: i64) -> Value {
        json!({
            "academic_semester_id": self.harness.next_semester.id,
            "start_date": "2026-07-01",
            "end_date": "2026-07-31",
            "min_credit": min,
            "max_credit": max,
        })
    }
}

fn id(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_checks_the_database() {
    let api = Api::new().await;
    let (status, body) = api.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["name"], "registrar-test");
}

#[tokio::test]
async fn tokens_and_roles_are_enforced() {
    let api = Api::new().await;

    let (status, body) = api
        .call(Method::GET, "/v1/semester-registrations", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = api
        .call(Method::GET, "/v1/semester-registrations", Some("bogus"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = api
        .student(0, Method::GET, "/v1/semester-registrations", None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = api
        .admin(Method::GET, "/v1/semester-registrations/my-registration", None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = api.student(0, Method::GET, "/v1/academic-semesters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn error_kinds_map_to_statuses() {
    let api = Api::new().await;

    let (status, body) = api
        .admin(Method::GET, "/v1/semester-registrations/missing", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));

    let (status, body) = api
        .admin(
            Method::POST,
            "/v1/semester-registrations",
            Some(json!({ "min_credit": "twelve" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, created) = api
        .admin(
            Method::POST,
            "/v1/semester-registrations",
            Some(api.registration_body(6, 18)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "UPCOMING");

    let (status, _) = api
        .admin(
            Method::POST,
            "/v1/semester-registrations",
            Some(api.registration_body(6, 18)),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/v1/semester-registrations/{}", id(&created));
    let (status, body) = api
        .admin(Method::PATCH, &uri, Some(json!({ "status": "ENDED" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid status transition from UPCOMING to ENDED");
}

#[tokio::test]
async fn registration_flow_over_http() {
    let api = Api::new().await;
    let h = &api.harness;

    let (_, registration) = api
        .admin(
            Method::POST,
            "/v1/semester-registrations",
            Some(api.registration_body(3, 18)),
        )
        .await;
    let registration_id = id(&registration);

    let (status, course) = api
        .admin(
            Method::POST,
            "/v1/courses",
            Some(json!({ "title": "Algorithms", "code": "CSE-201", "credits": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, offered) = api
        .admin(
            Method::POST,
            "/v1/offered-courses",
            Some(json!({
                "academic_department_id": h.department.id,
                "semester_registration_id": registration_id,
                "course_ids": [id(&course)],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let offered_id = id(&offered[0]);

    let (status, section) = api
        .admin(
            Method::POST,
            "/v1/offered-course-sections",
            Some(json!({ "title": "A", "max_capacity": 1, "offered_course_id": offered_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let section_id = id(&section);

    let schedule = |start: &str, end: &str| {
        json!({
            "day_of_week": "MONDAY",
            "start_time": start,
            "end_time": end,
            "offered_course_section_id": section_id,
            "room_id": h.rooms[0].id,
            "faculty_id": h.instructors[0].id,
        })
    };
    let (status, _) = api
        .admin(
            Method::POST,
            "/v1/offered-course-class-schedules",
            Some(schedule("10:00", "11:00")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = api
        .admin(
            Method::POST,
            "/v1/offered-course-class-schedules",
            Some(schedule("10:30", "11:30")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "room is already booked into this slot");

    let (status, schedules) = api
        .student(
            0,
            Method::GET,
            &format!("/v1/offered-course-sections/{section_id}/class-schedules"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schedules.as_array().unwrap().len(), 1);

    let (status, body) = api
        .student(0, Method::POST, "/v1/semester-registrations/start-registration", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "registration is not started yet");

    let registration_uri = format!("/v1/semester-registrations/{registration_id}");
    let (status, _) = api
        .admin(
            Method::PATCH,
            &registration_uri,
            Some(json!({ "status": "ONGOING" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for index in 0..2 {
        let (status, _) = api
            .student(index, Method::POST, "/v1/semester-registrations/start-registration", None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, available) = api
        .student(0, Method::GET, "/v1/semester-registrations/my-available-courses", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(available[0]["is_taken"], false);
    assert_eq!(available[0]["sections"][0]["schedules"][0]["start_time"], "10:00");

    let payload = json!({ "offered_course_id": offered_id, "offered_course_section_id": section_id });
    let enroll_uri = "/v1/semester-registrations/enroll-into-course";
    let (status, selection) = api
        .student(0, Method::POST, enroll_uri, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(selection["message"], "successfully enrolled into course");
    assert_eq!(selection["offered_course_section_id"], section_id);
    let (status, body) = api
        .student(1, Method::POST, enroll_uri, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "capacity is full");

    let (status, envelope) = api
        .student(
            0,
            Method::POST,
            "/v1/semester-registrations/withdraw-from-course",
            Some(payload.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["message"], "successfully withdrawn from course");
    assert_eq!(envelope["total_credits_taken"], 0);
    let (status, _) = api
        .student(0, Method::POST, enroll_uri, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, envelope) = api
        .student(0, Method::POST, "/v1/semester-registrations/confirm-my-registration", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["message"], "your registration is confirmed");
    assert_eq!(envelope["is_confirmed"], true);
    assert_eq!(envelope["total_credits_taken"], 3);

    let (status, _) = api
        .admin(Method::PATCH, &registration_uri, Some(json!({ "status": "ENDED" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, summary) = api
        .admin(
            Method::POST,
            &format!("{registration_uri}/start-new-semester"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["payments_created"], 1);
    assert_eq!(summary["enrolled_courses_created"], 1);

    let (status, payments) = api
        .student(0, Method::GET, "/v1/students/me/payments", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments[0]["full_payment_amount"], 15_000);
    assert_eq!(payments[0]["payment_status"], "PENDING");

    let (_, enrolled) = api
        .student(0, Method::GET, "/v1/students/me/enrolled-courses", None)
        .await;
    assert_eq!(enrolled.as_array().unwrap().len(), 1);
    assert_eq!(enrolled[0]["status"], "ONGOING");

    let (_, none) = api
        .student(1, Method::GET, "/v1/students/me/payments", None)
        .await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn admin_creates_academic_records() {
    let api = Api::new().await;

    let (status, building) = api
        .admin(Method::POST, "/v1/buildings", Some(json!({ "title": "Annex" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = api
        .admin(
            Method::POST,
            "/v1/rooms",
            Some(json!({ "room_number": "201", "floor": "2", "building_id": id(&building) })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = api
        .admin(
            Method::POST,
            "/v1/rooms",
            Some(json!({ "room_number": "201", "floor": "2", "building_id": id(&building) })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = api
        .admin(
            Method::POST,
            "/v1/rooms",
            Some(json!({ "room_number": "1", "floor": "1", "building_id": "missing" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .student(0, Method::POST, "/v1/buildings", Some(json!({ "title": "Nope" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, rooms) = api.student(0, Method::GET, "/v1/rooms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms["meta"]["total"], 3);
}
