use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

/// Mounted at `/specialities`.
pub fn speciality_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_specialities))
        .route("/{speciality_id}", get(handlers::get_speciality))
        .with_state(state)
}

/// Mounted at `/admin/specialities`; the admin cell applies authentication.
pub fn speciality_admin_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_all_specialities).post(handlers::create_speciality),
        )
        .route(
            "/{speciality_id}",
            get(handlers::get_speciality)
                .put(handlers::update_speciality)
                .delete(handlers::delete_speciality),
        )
        .with_state(state)
}
