use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::router::{doctor_admin_routes, doctor_routes, time_slot_routes};
use doctor_cell::DOCTOR_COLUMNS;
use shared_utils::test_utils::{JwtTestUtils, MockPostgrestResponses, TestConfig, TestUser};

fn config_for(server: &MockServer) -> TestConfig {
    TestConfig::with_backend(&server.uri())
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn mount_doctor(server: &MockServer, doctor_id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .and(query_param("select", DOCTOR_COLUMNS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::doctor_row(doctor_id, "Dr. Meera Iyer", Some(1))
        ])))
        .mount(server)
        .await;
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_list_doctors_is_paginated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("offset", "10"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::doctor_row(11, "Dr. Meera Iyer", Some(1)),
            MockPostgrestResponses::doctor_row(12, "Dr. Arjun Rao", None),
        ])))
        .mount(&mock_server)
        .await;

    let app: Router = doctor_routes(config_for(&mock_server).to_state());
    let response = app.oneshot(get("/?skip=10&limit=5")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doctors = read_json(response).await;
    assert_eq!(doctors.as_array().unwrap().len(), 2);
    assert_eq!(doctors[0]["speciality"]["name"], "Cardiology");
    assert!(doctors[1]["speciality"].is_null());
    assert!(doctors[0].get("image_data").is_none());
}

#[tokio::test]
async fn test_unknown_doctor_is_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = doctor_routes(config_for(&mock_server).to_state());
    let response = app.oneshot(get("/99")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["detail"], "Doctor not found");
}

#[tokio::test]
async fn test_available_slots_rejects_bad_date() {
    let mock_server = MockServer::start().await;

    let app = doctor_routes(config_for(&mock_server).to_state());
    let response = app.oneshot(get("/1/available-slots/05-03-2035")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["detail"], "Invalid date format. Use YYYY-MM-DD");
}

#[tokio::test]
async fn test_available_slots_marks_booked_times() {
    let mock_server = MockServer::start().await;
    mount_doctor(&mock_server, 1).await;

    // 2035-03-05 is a Monday (day 0).
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(query_param("doctor_id", "eq.1"))
        .and(query_param("day_of_week", "eq.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::time_slot_row(4, 1, 0, "09:00:00", "10:30:00", 30)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", "eq.1"))
        .and(query_param("status", "in.(scheduled,confirmed)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "date": "2035-03-05T09:30:00" }
        ])))
        .mount(&mock_server)
        .await;

    let app = doctor_routes(config_for(&mock_server).to_state());
    let response = app.oneshot(get("/1/available-slots/2035-03-05")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["doctor_name"], "Dr. Meera Iyer");
    assert_eq!(body["day_of_week"], 0);
    assert_eq!(
        body["available_slots"],
        json!([
            { "time": "09:00", "is_available": true, "slot_id": 4 },
            { "time": "09:30", "is_available": false, "slot_id": 4 },
            { "time": "10:00", "is_available": true, "slot_id": 4 }
        ])
    );
}

#[tokio::test]
async fn test_create_time_slot_rejects_overlap() {
    let mock_server = MockServer::start().await;
    mount_doctor(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(query_param("doctor_id", "eq.1"))
        .and(query_param("day_of_week", "eq.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::time_slot_row(8, 1, 2, "09:00:00", "12:00:00", 30)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_time_slots"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/doctors/1/time-slots",
            json!({ "day_of_week": 2, "start_time": "11:00", "end_time": "13:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        read_json(response).await["detail"],
        "Time slot overlaps with an existing slot (09:00-12:00)"
    );
}

#[tokio::test]
async fn test_create_time_slot_validates_window() {
    let mock_server = MockServer::start().await;

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/doctors/1/time-slots",
            json!({ "day_of_week": 1, "start_time": "17:00", "end_time": "09:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["detail"], "Start time must be before end time");
}

#[tokio::test]
async fn test_create_time_slot_defaults_duration() {
    let mock_server = MockServer::start().await;
    mount_doctor(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_time_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(body_partial_json(json!({
            "doctor_id": 1,
            "start_time": "14:00:00",
            "end_time": "16:00:00",
            "slot_duration_minutes": 30
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPostgrestResponses::time_slot_row(9, 1, 3, "14:00:00", "16:00:00", 30)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = time_slot_routes(config_for(&mock_server).to_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "doctor_id": 1, "day_of_week": 3, "start_time": "14:00", "end_time": "16:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let slot = read_json(response).await;
    assert_eq!(slot["id"], 9);
    assert_eq!(slot["start_time"], "14:00:00");
}

// Monday windows for doctor 1: slot 4 (09:00-12:00) and slot 5 (14:00-16:00).
async fn mount_monday_windows(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(query_param("id", "eq.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::time_slot_row(4, 1, 0, "09:00:00", "12:00:00", 30)
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(query_param("doctor_id", "eq.1"))
        .and(query_param("day_of_week", "eq.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::time_slot_row(4, 1, 0, "09:00:00", "12:00:00", 30),
            MockPostgrestResponses::time_slot_row(5, 1, 0, "14:00:00", "16:00:00", 30)
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_update_time_slot_does_not_clash_with_itself() {
    let mock_server = MockServer::start().await;
    mount_monday_windows(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(query_param("id", "eq.4"))
        .and(body_partial_json(json!({ "end_time": "13:00:00" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::time_slot_row(4, 1, 0, "09:00:00", "13:00:00", 30)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let response = app
        .oneshot(json_request("PUT", "/time-slots/4", json!({ "end_time": "13:00:45" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["end_time"], "13:00:00");
}

#[tokio::test]
async fn test_update_time_slot_onto_neighbour_is_conflict() {
    let mock_server = MockServer::start().await;
    mount_monday_windows(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctor_time_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let response = app
        .oneshot(json_request(
            "PUT",
            "/time-slots/4",
            json!({ "start_time": "13:00", "end_time": "15:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        read_json(response).await["detail"],
        "Time slot overlaps with an existing slot (14:00-16:00)"
    );
}

#[tokio::test]
async fn test_flat_time_slot_routes_require_admin_token() {
    let mock_server = MockServer::start().await;
    let config = TestConfig {
        require_admin_auth: true,
        ..config_for(&mock_server)
    };

    let app = time_slot_routes(config.to_state());
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let patient_token = JwtTestUtils::create_test_token(&TestUser::patient("asha@example.com"), &config.jwt_secret, None);
    let request = Request::builder()
        .uri("/")
        .header("Authorization", format!("Bearer {}", patient_token))
        .body(Body::empty())
        .unwrap();
    let response = time_slot_routes(config.to_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_toggle_flips_availability() {
    let mock_server = MockServer::start().await;
    let config = TestConfig {
        require_admin_auth: true,
        ..config_for(&mock_server)
    };

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(query_param("id", "eq.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::time_slot_row(4, 1, 0, "09:00:00", "10:00:00", 30)
        ])))
        .mount(&mock_server)
        .await;

    let mut toggled = MockPostgrestResponses::time_slot_row(4, 1, 0, "09:00:00", "10:00:00", 30);
    toggled["is_available"] = json!(false);
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctor_time_slots"))
        .and(body_partial_json(json!({ "is_available": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([toggled])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = JwtTestUtils::create_test_token(&TestUser::admin("admin@example.com"), &config.jwt_secret, None);
    let request = Request::builder()
        .method("PUT")
        .uri("/4/toggle")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = time_slot_routes(config.to_state()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["is_available"], false);
}

#[tokio::test]
async fn test_delete_doctor_with_appointments_is_rejected() {
    let mock_server = MockServer::start().await;
    mount_doctor(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", "eq.1"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "0-0/2")
                .set_body_json(json!([{ "id": 1 }])),
        )
        .mount(&mock_server)
        .await;

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let request = Request::builder()
        .method("DELETE")
        .uri("/doctors/1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["detail"],
        "Cannot delete doctor. 2 appointments are associated with this doctor."
    );
}

#[tokio::test]
async fn test_create_doctor_with_unknown_speciality() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let response = app
        .oneshot(json_request("POST", "/doctors", json!({ "name": "Dr. New", "speciality_id": 77 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["detail"], "Specialty not found");
}

#[tokio::test]
async fn test_image_upload_and_download() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.1"))
        .and(body_partial_json(json!({
            "image_content_type": "image/png",
            "image_url": "/doctors/1/image",
            "image_data": "UE5HREFUQQ=="
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let boundary = "clinic-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"doctor.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/doctors/1/image")
        .header("Content-Type", format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))
        .unwrap();

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["image_url"], "/doctors/1/image");

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("select", "image_data,image_content_type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "image_data": "UE5HREFUQQ==", "image_content_type": "image/png" }
        ])))
        .mount(&mock_server)
        .await;

    let app = doctor_routes(config_for(&mock_server).to_state());
    let response = app.oneshot(get("/1/image")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"PNGDATA");
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let mock_server = MockServer::start().await;

    let boundary = "clinic-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/doctors/1/image")
        .header("Content-Type", format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))
        .unwrap();

    let app = doctor_admin_routes(config_for(&mock_server).to_state());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["detail"], "File must be an image");
}
