use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use appointment_cell::router::{appointment_routes, patient_appointment_routes};
use callback_cell::router::callback_routes;
use chat_button_cell::router::chat_button_routes;
use doctor_cell::router::{doctor_routes, time_slot_routes};
use health_package_cell::router::health_package_routes;
use monitoring_cell::health_routes;
use patient_cell::router::patient_routes;
use shared_database::AppState;
use speciality_cell::router::speciality_routes;

pub fn create_router(state: AppState) -> Router {
    let patients = patient_routes(state.clone()).merge(patient_appointment_routes(state.clone()));

    Router::new()
        .route("/", get(|| async { "Healthcare API is running!" }))
        .merge(health_routes(state.clone()))
        .nest("/specialities", speciality_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/doctor-time-slots", time_slot_routes(state.clone()))
        .nest("/patients", patients)
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/health-packages", health_package_routes(state.clone()))
        .nest("/callback-requests", callback_routes(state.clone()))
        .nest("/chat-buttons", chat_button_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}
