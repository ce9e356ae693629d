use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use http::header::AUTHORIZATION;
use tracing::warn;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Guards back-office routes. With `require_admin_auth` off every request
/// passes through untouched.
pub async fn admin_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !config.require_admin_auth {
        return Ok(next.run(request).await);
    }

    let user = authenticate(request.headers(), &config.supabase_jwt_secret)?;

    if !user.is_admin() {
        warn!("User {} attempted an admin operation", user.id);
        return Err(AppError::Forbidden("Administrator role required".to_string()));
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

pub fn authenticate(headers: &HeaderMap, jwt_secret: &str) -> Result<User, AppError> {
    let token = bearer_token(headers)?;
    validate_token(token, jwt_secret).map_err(AppError::Auth)
}
