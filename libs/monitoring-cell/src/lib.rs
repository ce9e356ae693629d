// Liveness and readiness probes.

pub mod handlers;
pub mod models;
pub mod router;

pub use models::{HealthResponse, ReadinessResponse};
pub use router::health_routes;
