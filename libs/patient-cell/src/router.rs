use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

/// Mounted at `/patients`; the appointment cell contributes `/{patient_id}/appointments`.
pub fn patient_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_patients).post(handlers::create_patient))
        .route("/search/{query}", get(handlers::search_patients))
        .route("/{patient_id}", get(handlers::get_patient).put(handlers::update_patient))
        .with_state(state)
}
