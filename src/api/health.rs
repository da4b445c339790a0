//! Liveness and readiness probes
//!
//! Both are on the resolution bypass list, so probes work regardless of the
//! Host header they send and before any tenant exists.

use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    /// Whether the domain directory can be queried
    pub directory: bool,
}

/// GET /health: process is up. Never touches storage.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /ready: the directory store answers.
pub async fn ready<S: HasServices>(
    State(state): State<S>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let directory = state.check_ready().await;
    let (code, status) = if directory {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    (
        code,
        Json(ReadinessResponse {
            status: status.to_string(),
            directory,
        }),
    )
}
