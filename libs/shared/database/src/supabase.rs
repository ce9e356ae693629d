use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE},
    Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::error::DbError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin client over the PostgREST API exposed by Supabase. All requests
/// authenticate with the server-side service key.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    fn with_timeout(config: &AppConfig, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            warn!("Falling back to an HTTP client without a request timeout: {}", e);
            Client::new()
        });

        Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, DbError> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key))?,
        );

        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Response, DbError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => DbError::Auth(error_text),
                404 => DbError::NotFound(error_text),
                409 => DbError::Conflict(error_text),
                code => DbError::Api { status: code, message: error_text },
            });
        }

        Ok(response)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, extra_headers).await?;
        let text = response.text().await?;

        if text.trim().is_empty() {
            return Err(DbError::EmptyResponse(path.to_string()));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// GET rows from a PostgREST path such as `/rest/v1/doctors?id=eq.1`.
    pub async fn select<T>(&self, path: &str) -> Result<Vec<T>, DbError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, None).await
    }

    pub async fn select_one<T>(&self, path: &str) -> Result<Option<T>, DbError>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<T> = self.select(path).await?;
        Ok(rows.into_iter().next())
    }

    /// INSERT a row and return the stored representation.
    pub async fn insert<T>(&self, table: &str, row: Value) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", table);
        let rows: Vec<T> = self
            .request_with_headers(Method::POST, &path, Some(row), Some(representation_headers()))
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::EmptyResponse(path))
    }

    /// PATCH the rows matched by `path`; `None` when nothing matched.
    pub async fn update<T>(&self, path: &str, changes: Value) -> Result<Option<T>, DbError>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<T> = self
            .request_with_headers(Method::PATCH, path, Some(changes), Some(representation_headers()))
            .await?;

        Ok(rows.into_iter().next())
    }

    /// DELETE the rows matched by `path` and return how many went away.
    pub async fn delete(&self, path: &str) -> Result<usize, DbError> {
        let rows: Vec<Value> = self
            .request_with_headers(Method::DELETE, path, None, Some(representation_headers()))
            .await?;

        Ok(rows.len())
    }

    /// Exact row count for a filtered table path, read from `Content-Range`.
    pub async fn count(&self, path: &str) -> Result<u64, DbError> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));
        headers.insert("Range-Unit", HeaderValue::from_static("items"));
        headers.insert("Range", HeaderValue::from_static("0-0"));

        let response = self.send(Method::GET, path, None, Some(headers)).await?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| DbError::ContentRange("missing".to_string()))?;

        parse_content_range_total(range)
    }

    /// Cheap reachability probe against the PostgREST root.
    pub async fn ping(&self) -> Result<(), DbError> {
        self.send(Method::GET, "/rest/v1/", None, None).await?;
        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

/// `0-0/42` -> 42, `*/0` -> 0.
pub fn parse_content_range_total(range: &str) -> Result<u64, DbError> {
    range
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse::<u64>().ok())
        .ok_or_else(|| DbError::ContentRange(range.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            supabase_url: server.uri(),
            supabase_service_key: "service-key".to_string(),
            supabase_jwt_secret: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![],
            require_admin_auth: false,
            clinic_utc_offset_minutes: 0,
            environment: "test".to_string(),
        }
    }

    fn client_for(server: &MockServer) -> SupabaseClient {
        SupabaseClient::new(&config_for(server))
    }

    #[tokio::test]
    async fn slow_backend_hits_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/specialities"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = SupabaseClient::with_timeout(&config_for(&server), Duration::from_millis(50));
        let result = client.select::<Value>("/rest/v1/specialities").await;
        assert_matches!(result, Err(DbError::Transport(e)) if e.is_timeout());
    }

    #[test]
    fn content_range_totals() {
        assert_eq!(parse_content_range_total("0-0/42").unwrap(), 42);
        assert_eq!(parse_content_range_total("*/0").unwrap(), 0);
        assert_matches!(parse_content_range_total("0-0/*"), Err(DbError::ContentRange(_)));
    }

    #[tokio::test]
    async fn select_sends_service_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/specialities"))
            .and(query_param("id", "eq.3"))
            .and(header("apikey", "service-key"))
            .and(header("Authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 3 }])))
            .mount(&server)
            .await;

        let row: Option<Value> = client_for(&server)
            .select_one("/rest/v1/specialities?id=eq.3")
            .await
            .unwrap();

        assert_eq!(row.unwrap()["id"], 3);
    }

    #[tokio::test]
    async fn unique_violation_maps_to_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/appointments"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint"
            })))
            .mount(&server)
            .await;

        let result: Result<Value, DbError> = client_for(&server)
            .insert("appointments", json!({ "doctor_id": 1 }))
            .await;

        assert_matches!(result, Err(DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn count_reads_content_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/doctors"))
            .and(header("Prefer", "count=exact"))
            .respond_with(
                ResponseTemplate::new(206)
                    .insert_header("Content-Range", "0-0/17")
                    .set_body_json(json!([{ "id": 1 }])),
            )
            .mount(&server)
            .await;

        let total = client_for(&server).count("/rest/v1/doctors?select=id").await.unwrap();
        assert_eq!(total, 17);
    }

    #[tokio::test]
    async fn update_without_match_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/patients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let updated: Option<Value> = client_for(&server)
            .update("/rest/v1/patients?id=eq.99", json!({ "city": "Pune" }))
            .await
            .unwrap();

        assert!(updated.is_none());
    }
}
