pub mod build;
pub mod health;
pub mod merge;

pub use build::*;
pub use health::*;
pub use merge::*;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::logging_middleware;

/// Shared, read-only request context.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Public document API.
pub fn api_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_size_bytes();

    Router::new()
        .route("/api/v1/build-latex", post(build_latex_handler))
        .route("/api/v1/merge", post(merge_handler))
        .route("/api/v1/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}

/// Probe endpoints served on the internal port.
pub fn internal_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(probe_health_handler))
        .route("/ready", get(ready_handler))
        .with_state(state)
}
