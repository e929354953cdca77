//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::{AppState, ModelState};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_loaded: bool,
    model_sha256: Option<String>,
    live_reading: bool,
    timestamp: i64,
}

/// Always 200; a missing model reports `degraded` instead of failing
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_sha256 = match state.model.as_ref() {
        ModelState::Ready { sha256, .. } => sha256.clone(),
        ModelState::Unavailable { .. } => None,
    };
    let model_loaded = state.model.is_ready();

    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        model_loaded,
        model_sha256,
        live_reading: state.latest.is_some(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
