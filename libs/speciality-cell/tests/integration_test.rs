use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{MockPostgrestResponses, TestConfig};
use speciality_cell::router::{speciality_admin_routes, speciality_routes};

fn public_app(server: &MockServer) -> Router {
    speciality_routes(TestConfig::with_backend(&server.uri()).to_state())
}

fn admin_app(server: &MockServer) -> Router {
    speciality_admin_routes(TestConfig::with_backend(&server.uri()).to_state())
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_list_active_specialities() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialities"))
        .and(query_param("is_active", "eq.true"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::speciality_row(1, "Cardiology"),
            MockPostgrestResponses::speciality_row(2, "Dermatology"),
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = public_app(&mock_server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json_response = read_json(response).await;
    assert_eq!(json_response.as_array().unwrap().len(), 2);
    assert_eq!(json_response[0]["name"], "Cardiology");
}

#[tokio::test]
async fn test_missing_speciality_is_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialities"))
        .and(query_param("id", "eq.42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder().uri("/42").body(Body::empty()).unwrap();
    let response = public_app(&mock_server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json_response = read_json(response).await;
    assert_eq!(json_response["detail"], "Speciality not found");
}

#[tokio::test]
async fn test_create_speciality_requires_name() {
    let mock_server = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "name": "   " }).to_string()))
        .unwrap();
    let response = admin_app(&mock_server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Speciality name is required");
}

#[tokio::test]
async fn test_create_speciality() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/specialities"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPostgrestResponses::speciality_row(7, "Neurology")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "name": "Neurology", "icon": "psychology" }).to_string()))
        .unwrap();
    let response = admin_app(&mock_server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["id"], 7);
}

#[tokio::test]
async fn test_delete_speciality_with_doctors_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialities"))
        .and(query_param("id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::speciality_row(1, "Cardiology")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("speciality_id", "eq.1"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "0-0/3")
                .set_body_json(json!([{ "id": 1 }])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/specialities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/1")
        .body(Body::empty())
        .unwrap();
    let response = admin_app(&mock_server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["detail"],
        "Cannot delete specialty. 3 doctors are associated with this specialty."
    );
}

#[tokio::test]
async fn test_delete_unused_speciality() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialities"))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::speciality_row(2, "Dermatology")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "*/0").set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/specialities"))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::speciality_row(2, "Dermatology")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/2")
        .body(Body::empty())
        .unwrap();
    let response = admin_app(&mock_server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["message"], "Specialty deleted successfully");
}
