use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::AppState;
use crate::models::HealthReply;
use crate::services::is_tool_available;

/// Health operation of the document API. Answering at all is the signal.
pub async fn health_handler() -> Json<HealthReply> {
    debug!("Health check requested");
    Json(HealthReply { healthy: true })
}

/// Detailed probe for operators: tool availability and blank page presence.
pub async fn probe_health_handler(State(state): State<AppState>) -> Json<Value> {
    let config = state.config.clone();

    let (latexmk, qpdf, convert) = tokio::task::spawn_blocking(move || {
        (
            is_tool_available(&config.tools.latexmk),
            is_tool_available(&config.tools.qpdf),
            is_tool_available(&config.tools.convert),
        )
    })
    .await
    .unwrap_or((false, false, false));

    let blank_page = state.config.pdf_blank_path.is_file();

    let status = if latexmk && qpdf && convert && blank_page {
        "healthy"
    } else {
        "degraded"
    };

    let timestamp = chrono::Utc::now().to_rfc3339();

    info!(
        status = status,
        latexmk = latexmk,
        qpdf = qpdf,
        convert = convert,
        blank_page = blank_page,
        "Health check completed"
    );

    Json(json!({
        "status": status,
        "service": state.config.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp,
        "tools": {
            "latexmk": latexmk,
            "qpdf": qpdf,
            "convert": convert
        },
        "blank_page": blank_page
    }))
}

/// Readiness: the workspace root must be usable.
pub async fn ready_handler(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    if state.config.workspace_root.is_dir() {
        info!("Readiness check passed");
        Ok(StatusCode::OK)
    } else {
        info!(
            workspace_root = %state.config.workspace_root.display(),
            "Readiness check failed - workspace root missing"
        );
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
