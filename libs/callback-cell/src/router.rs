use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::admin_middleware;

use crate::handlers;

/// Mounted at `/callback-requests`. Submitting is public; the call queue is admin only.
pub fn callback_routes(state: AppState) -> Router {
    let public = Router::new().route("/", post(handlers::create_callback_request));

    let admin = Router::new()
        .route("/", get(handlers::list_callback_requests))
        .route("/{request_id}", put(handlers::update_callback_request))
        .route_layer(middleware::from_fn_with_state(state.config.clone(), admin_middleware));

    public.merge(admin).with_state(state)
}
