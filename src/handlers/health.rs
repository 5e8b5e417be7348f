//! Health check handler for load balancers and monitoring.

use axum::Json;
use serde::Serialize;

/// Public health check response
///
/// Simple status indicator; no build metadata is exposed.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
}

/// GET /api/health
pub async fn health_check() -> Json<HealthCheckResponse> {
    tracing::debug!("health check requested");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}
