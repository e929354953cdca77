//! Latest reading handler

use axum::{extract::State, Json};

use crate::error::{AppError, AppResult};
use crate::state::{AppState, LatestSnapshot};

/// Most recent successful prediction, or the waiting placeholder.
/// Answers 404 when live reading is disabled.
pub async fn get(State(state): State<AppState>) -> AppResult<Json<LatestSnapshot>> {
    let latest = state
        .latest
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Live reading is disabled".to_string()))?;

    Ok(Json(latest.get()))
}
