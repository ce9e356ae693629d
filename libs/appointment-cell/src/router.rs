use axum::{
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;

use crate::handlers;

/// Mounted at `/appointments`.
pub fn appointment_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/book", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", put(handlers::update_appointment_status))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment))
        .with_state(state)
}

/// Merged into the `/patients` router.
pub fn patient_appointment_routes(state: AppState) -> Router {
    Router::new()
        .route("/{patient_id}/appointments", get(handlers::list_patient_appointments))
        .with_state(state)
}
