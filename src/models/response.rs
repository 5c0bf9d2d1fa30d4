use serde::{Deserialize, Serialize};

use super::base64_bytes;
use crate::error::AppError;

/// Outcome of a build or merge. `data` is empty whenever `success` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReply {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub success: bool,
    pub note: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReply {
    pub healthy: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl FileReply {
    pub fn success(data: Vec<u8>, note: impl Into<String>) -> Self {
        Self {
            data,
            success: true,
            note: note.into(),
        }
    }

    pub fn failure(error: &AppError) -> Self {
        Self {
            data: Vec::new(),
            success: false,
            note: error.note(),
        }
    }
}
