use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use std::time::Instant;
use tracing::{error, info};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{BuildLatexRequest, FileReply};
use crate::services::LatexBuilder;

pub async fn build_latex_handler(
    State(state): State<AppState>,
    payload: Result<Json<BuildLatexRequest>, JsonRejection>,
) -> AppResult<Json<FileReply>> {
    let Json(request) = payload.map_err(|e| AppError::invalid_request(e.body_text()))?;
    Ok(Json(build_latex(&state, &request).await))
}

/// Runs a build and folds any pipeline failure into the reply.
pub async fn build_latex(state: &AppState, request: &BuildLatexRequest) -> FileReply {
    let start = Instant::now();
    info!(files = request.files.len(), "BuildLatex request received");

    let reply = match LatexBuilder::new(state.config.clone()).build(&request.files).await {
        Ok(pdf) => FileReply::success(pdf, "build successful"),
        Err(e) => {
            error!(error_code = e.error_code(), error = %e, "build failed");
            FileReply::failure(&e)
        }
    };

    info!(
        success = reply.success,
        bytes = reply.data.len(),
        total_time_ms = start.elapsed().as_millis() as u64,
        "BuildLatex request completed"
    );

    reply
}
