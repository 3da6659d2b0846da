//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub database_latency_ms: u64,
}

/// Readiness check endpoint: probes document-database connectivity.
///
/// An unreachable database surfaces as the standard error envelope.
pub async fn ready(State(state): State<AppState>) -> ApiResult<Json<ReadinessResponse>> {
    let latency = state.firestore.ping().await?;

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        database_latency_ms: latency.as_millis() as u64,
    }))
}
