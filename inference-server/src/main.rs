//! Fallwatch Inference Server
//!
//! Serves the fall classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FALLWATCH SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  Router   │  │  ModelState   │  │  LatestReading      │ │
//! │  │  (Axum)   │─►│  (Arc, r/o)   │  │  (RwLock snapshot)  │ │
//! │  └─────┬─────┘  └───────────────┘  └──────────▲──────────┘ │
//! │        └──────────── /predict ────────────────┘            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use fallwatch_server::{create_router, init_tracing, AppState, Config, ModelState, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    init_tracing(DEFAULT_LOG_FILTER);
    let config = Config::from_env();

    tracing::info!("Fallwatch server starting...");
    tracing::info!("Model: {}", config.model_path.display());

    // A missing or stale model leaves the server up in degraded mode
    let model = ModelState::load(&config.model_path);
    if !model.is_ready() {
        tracing::warn!("Serving without a model; /predict will answer 500");
    }
    if !config.live_reading {
        tracing::info!("Live reading disabled; /latest is not served");
    }

    let state = AppState::new(config.clone(), model);
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
