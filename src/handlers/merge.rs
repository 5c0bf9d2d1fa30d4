use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use std::time::Instant;
use tracing::{error, info};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{FileReply, MergeRequest};
use crate::services::PdfMerger;

pub async fn merge_handler(
    State(state): State<AppState>,
    payload: Result<Json<MergeRequest>, JsonRejection>,
) -> AppResult<Json<FileReply>> {
    let Json(request) = payload.map_err(|e| AppError::invalid_request(e.body_text()))?;
    Ok(Json(merge(&state, &request).await))
}

pub async fn merge(state: &AppState, request: &MergeRequest) -> FileReply {
    let start = Instant::now();
    info!(
        files = request.files.len(),
        force_even = request.force_even,
        "Merge request received"
    );

    let merger = PdfMerger::new(state.config.clone());
    let reply = match merger.merge(&request.files, request.force_even).await {
        Ok(pdf) => FileReply::success(pdf, "merge successful"),
        Err(e) => {
            error!(error_code = e.error_code(), error = %e, "merge failed");
            FileReply::failure(&e)
        }
    };

    info!(
        success = reply.success,
        bytes = reply.data.len(),
        total_time_ms = start.elapsed().as_millis() as u64,
        "Merge request completed"
    );

    reply
}
