//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Provide numeric acc_x, acc_y, acc_z.";
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Model not loaded on server.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body has a non-numeric reading field
    #[error("{0}")]
    InvalidInput(String),

    /// Model failed to load at startup; carries the load error
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ModelUnavailable(reason) => {
                tracing::warn!("Rejecting inference, model unavailable: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, MODEL_UNAVAILABLE_MESSAGE)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
