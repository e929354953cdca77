//! Fallwatch Inference Server
//!
//! HTTP front for the fall classifier plus the serial relay that feeds it.
//!
//! ```text
//!  sensor ──serial──► relay ──POST /predict──► server ──► Classifier
//!                                                │
//!                        dashboard ◄─GET /latest─┘ (LatestReading)
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::{AppState, LatestReading, LatestSnapshot, ModelState};

/// Default `RUST_LOG` filter for both binaries
pub const DEFAULT_LOG_FILTER: &str = "fallwatch_server=debug,fallwatch_core=info,tower_http=debug";

/// Install the global tracing subscriber
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/latest", get(handlers::latest::get))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
