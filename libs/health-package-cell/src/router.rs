use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::image::IMAGE_BODY_LIMIT;

use crate::handlers;

/// Mounted at `/health-packages`.
pub fn health_package_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_health_packages))
        .route("/book", post(handlers::book_health_package))
        .route("/bookings", get(handlers::list_bookings))
        .route(
            "/bookings/{booking_id}",
            get(handlers::get_booking).put(handlers::update_booking),
        )
        .route("/{package_id}", get(handlers::get_health_package))
        .route("/{package_id}/image", get(handlers::get_health_package_image))
        .with_state(state)
}

/// Package catalogue management, merged under `/admin` by the admin cell.
pub fn health_package_admin_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/health-packages",
            get(handlers::list_all_health_packages).post(handlers::create_health_package),
        )
        .route(
            "/health-packages/{package_id}",
            get(handlers::get_health_package_admin)
                .put(handlers::update_health_package)
                .delete(handlers::delete_health_package),
        )
        .route(
            "/health-packages/{package_id}/image",
            post(handlers::upload_health_package_image).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route(
            "/health-packages/{package_id}/tests",
            get(handlers::list_package_tests).post(handlers::create_package_test),
        )
        .route(
            "/health-package-tests/{test_id}",
            put(handlers::update_package_test).delete(handlers::delete_package_test),
        )
        .with_state(state)
}
