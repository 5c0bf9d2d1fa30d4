use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("file type for {name} unsupported")]
    UnsupportedFile { name: String },

    #[error("failed to convert image {name} to pdf: {message}")]
    ConversionError { name: String, message: String },

    #[error("{tool} failed (exit code {}): {detail}", exit_code_label(.code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        detail: String,
    },

    #[error("{tool} could not be started: {message}")]
    ToolUnavailable { tool: String, message: String },

    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    #[error("PDF processing failed: {message}")]
    ProcessingError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::UnsupportedFile { .. } => "UNSUPPORTED_FILE",
            AppError::ConversionError { .. } => "CONVERSION_ERROR",
            AppError::ToolFailed { .. } => "TOOL_FAILED",
            AppError::ToolUnavailable { .. } => "TOOL_UNAVAILABLE",
            AppError::Timeout { .. } => "TOOL_TIMEOUT",
            AppError::ProcessingError { .. } => "PROCESSING_ERROR",
            AppError::InvalidRequest { .. } => "INVALID_REQUEST",
            AppError::ConfigError { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Status for an error rendered as an HTTP error body. Pipeline failures
    /// travel as a `FileReply` with status 200, so in practice only request
    /// rejections reach this path.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFile { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ConversionError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ToolFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ToolUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::ProcessingError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// One-line text for the `note` field of a failed reply.
    pub fn note(&self) -> String {
        self.to_string()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let request_id = Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            request_id = %request_id,
            error_message = %message,
            "API error occurred"
        );

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
                "request_id": request_id,
                "timestamp": timestamp
            },
            "data": null
        }));

        (status, body).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        AppError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
