use axum::{middleware, routing::get, Router};

use doctor_cell::router::doctor_admin_routes;
use health_package_cell::router::health_package_admin_routes;
use shared_database::AppState;
use shared_utils::extractor::admin_middleware;
use speciality_cell::router::speciality_admin_routes;

use crate::handlers;

/// The whole back office, mounted at `/admin` behind one admin check.
pub fn admin_routes(state: AppState) -> Router {
    let dashboard = Router::new()
        .route("/dashboard/stats", get(handlers::dashboard_stats))
        .with_state(state.clone());

    Router::new()
        .nest("/specialities", speciality_admin_routes(state.clone()))
        .merge(doctor_admin_routes(state.clone()))
        .merge(health_package_admin_routes(state.clone()))
        .merge(dashboard)
        .layer(middleware::from_fn_with_state(state.config.clone(), admin_middleware))
}
