use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use callback_cell::router::callback_routes;
use shared_utils::test_utils::{JwtTestUtils, MockPostgrestResponses, TestConfig, TestUser};

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
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
async fn test_submit_callback_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/callback_requests"))
        .and(body_partial_json(json!({ "mobile_number": "98765 43210", "status": "pending" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPostgrestResponses::callback_row(7, "98765 43210", "pending")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Submitting stays public even with admin auth on.
    let config = TestConfig {
        require_admin_auth: true,
        ..TestConfig::with_backend(&mock_server.uri())
    };
    let app = callback_routes(config.to_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "mobile_number": " 98765 43210 ", "preferred_time": "Morning" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["status"], "pending");
    assert_eq!(
        body["message"],
        "Thank you for your callback request! Our healthcare executive will contact you shortly."
    );
}

#[tokio::test]
async fn test_short_mobile_number_is_rejected() {
    let mock_server = MockServer::start().await;

    let app = callback_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app
        .oneshot(json_request("POST", "/", json!({ "mobile_number": "12345" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["error"],
        "Mobile number must have at least 10 digits"
    );
}

#[tokio::test]
async fn test_overlong_mobile_number_never_reaches_database() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/callback_requests"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = callback_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app
        .oneshot(json_request("POST", "/", json!({ "mobile_number": "+91 (98765) - 43210 - 12" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["error"],
        "Mobile number cannot be longer than 20 characters"
    );
}

#[tokio::test]
async fn test_listing_requires_admin_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/callback_requests"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("status", "eq.pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::callback_row(9, "9123456780", "pending"),
            MockPostgrestResponses::callback_row(8, "9876543210", "pending"),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig {
        require_admin_auth: true,
        ..TestConfig::with_backend(&mock_server.uri())
    };

    let anonymous = callback_routes(config.to_state())
        .oneshot(Request::builder().uri("/?status=pending").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = JwtTestUtils::create_test_token(&TestUser::admin("admin@clinic.com"), &config.jwt_secret, None);
    let response = callback_routes(config.to_state())
        .oneshot(
            Request::builder()
                .uri("/?status=pending")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let requests = read_json(response).await;
    assert_eq!(requests.as_array().unwrap().len(), 2);
    assert_eq!(requests[0]["id"], 9);
}

#[tokio::test]
async fn test_first_contact_stamps_contacted_at() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/callback_requests"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::callback_row(7, "9876543210", "pending")
        ])))
        .mount(&mock_server)
        .await;

    let mut contacted = MockPostgrestResponses::callback_row(7, "9876543210", "contacted");
    contacted["contacted_at"] = json!("2024-01-02T10:00:00+00:00");
    contacted["executive_notes"] = json!("Booked for Friday");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/callback_requests"))
        .and(body_partial_json(json!({ "status": "contacted", "executive_notes": "Booked for Friday" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([contacted])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = callback_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app
        .oneshot(json_request(
            "PUT",
            "/7",
            json!({ "status": "contacted", "executive_notes": "Booked for Friday" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["status"], "contacted");
    assert!(!updated["contacted_at"].is_null());

    let requests = mock_server.received_requests().await.unwrap();
    let patch = requests.iter().find(|r| r.method.as_str() == "PATCH").unwrap();
    let sent: Value = serde_json::from_slice(&patch.body).unwrap();
    assert!(sent.get("contacted_at").is_some());
}

#[tokio::test]
async fn test_update_unknown_request_is_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/callback_requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = callback_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app
        .oneshot(json_request("PUT", "/404", json!({ "status": "completed" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "Callback request not found");
}
