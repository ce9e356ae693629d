use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::admin_middleware;
use shared_utils::image::IMAGE_BODY_LIMIT;

use crate::handlers;

/// Mounted at `/doctors`.
pub fn doctor_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/speciality/{speciality_id}", get(handlers::list_doctors_by_speciality))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/time-slots", get(handlers::get_doctor_time_slots))
        .route("/{doctor_id}/available-slots/{date}", get(handlers::get_available_slots))
        .route("/{doctor_id}/image", get(handlers::get_doctor_image))
        .with_state(state)
}

/// Doctor and time-slot management, merged under `/admin` by the admin cell.
pub fn doctor_admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_all_doctors).post(handlers::create_doctor))
        .route(
            "/doctors/{doctor_id}",
            get(handlers::get_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::delete_doctor),
        )
        .route(
            "/doctors/{doctor_id}/image",
            post(handlers::upload_doctor_image).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route(
            "/doctors/{doctor_id}/time-slots",
            get(handlers::list_doctor_time_slots_admin).post(handlers::create_doctor_time_slot),
        )
        .route(
            "/time-slots/{slot_id}",
            put(handlers::update_time_slot).delete(handlers::delete_time_slot),
        )
        .with_state(state)
}

/// Flat `/doctor-time-slots` routes kept for older admin screens.
pub fn time_slot_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_all_time_slots).post(handlers::create_time_slot))
        .route(
            "/{slot_id}",
            put(handlers::update_time_slot).delete(handlers::delete_time_slot),
        )
        .route("/{slot_id}/toggle", put(handlers::toggle_time_slot))
        .layer(middleware::from_fn_with_state(state.config.clone(), admin_middleware))
        .with_state(state)
}
