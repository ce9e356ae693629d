use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::admin_middleware;

use crate::handlers;

/// Mounted at `/chat-buttons`. Reads are public, mutations need an admin.
pub fn chat_button_routes(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(handlers::list_chat_buttons))
        .route("/active", get(handlers::list_active_chat_buttons))
        .route("/{button_id}", get(handlers::get_chat_button));

    let admin = Router::new()
        .route("/", post(handlers::create_chat_button))
        .route(
            "/{button_id}",
            put(handlers::update_chat_button).delete(handlers::delete_chat_button),
        )
        .route("/{button_id}/toggle", patch(handlers::toggle_chat_button))
        .route_layer(middleware::from_fn_with_state(state.config.clone(), admin_middleware));

    public.merge(admin).with_state(state)
}
