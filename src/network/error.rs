use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}")]
    Status {
        status: StatusCode,
        body: Option<serde_json::Value>,
    },

    #[error("Session is no longer valid")]
    SessionInvalidated,

    #[error("Access token cannot be sent as a header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Session storage failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to read upload {path}: {source}")]
    Upload {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn is_session_invalidated(&self) -> bool {
        matches!(self, ApiError::SessionInvalidated)
    }
}
