use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_button_cell::router::chat_button_routes;
use shared_utils::test_utils::{JwtTestUtils, MockPostgrestResponses, TestConfig, TestUser};

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
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
async fn test_list_buttons_filters_and_orders() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/chat_buttons"))
        .and(query_param("order", "display_order.asc,created_at.asc"))
        .and(query_param("is_active", "eq.false"))
        .and(query_param("category", "eq.booking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::chat_button_row(3, "Old promo", false)
        ])))
        .mount(&mock_server)
        .await;

    let app = chat_button_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app.oneshot(get("/?is_active=false&category=booking")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let buttons = read_json(response).await;
    assert_eq!(buttons[0]["button_text"], "Old promo");
}

#[tokio::test]
async fn test_active_buttons_are_public() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/chat_buttons"))
        .and(query_param("is_active", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::chat_button_row(1, "Book Appointment", true),
            MockPostgrestResponses::chat_button_row(2, "Health Packages", true),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig {
        require_admin_auth: true,
        ..TestConfig::with_backend(&mock_server.uri())
    };
    let response = chat_button_routes(config.to_state()).oneshot(get("/active")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_requires_admin_and_text() {
    let mock_server = MockServer::start().await;
    let config = TestConfig {
        require_admin_auth: true,
        ..TestConfig::with_backend(&mock_server.uri())
    };

    let body = json!({ "button_text": "  ", "button_action": "call_clinic" });
    let anonymous = chat_button_routes(config.to_state())
        .oneshot(json_request("POST", "/", body.clone()))
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = JwtTestUtils::create_test_token(&TestUser::admin("admin@clinic.com"), &config.jwt_secret, None);
    let mut request = json_request("POST", "/", body);
    request
        .headers_mut()
        .insert("Authorization", format!("Bearer {}", token).parse().unwrap());
    let response = chat_button_routes(config.to_state()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Button text is required");
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/chat_buttons"))
        .and(body_partial_json(json!({
            "button_text": "Call us",
            "button_color": "primary",
            "button_variant": "contained",
            "display_order": 0,
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPostgrestResponses::chat_button_row(5, "Call us", true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = chat_button_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "button_text": "Call us", "button_action": "call_clinic" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["id"], 5);
}

#[tokio::test]
async fn test_toggle_flips_is_active() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/chat_buttons"))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::chat_button_row(2, "Health Packages", true)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/chat_buttons"))
        .and(body_partial_json(json!({ "is_active": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::chat_button_row(2, "Health Packages", false)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = chat_button_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app
        .oneshot(Request::builder().method("PATCH").uri("/2/toggle").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["is_active"], false);
}

#[tokio::test]
async fn test_delete_missing_button_is_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/chat_buttons"))
        .and(query_param("id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = chat_button_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app
        .oneshot(Request::builder().method("DELETE").uri("/99").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "Chat button not found");
}

#[tokio::test]
async fn test_empty_update_returns_current_button() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/chat_buttons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::chat_button_row(4, "Directions", true)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/chat_buttons"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = chat_button_routes(TestConfig::with_backend(&mock_server.uri()).to_state());
    let response = app.oneshot(json_request("PUT", "/4", json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["button_text"], "Directions");
}
