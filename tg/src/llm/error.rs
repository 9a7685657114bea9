//! LLM transport error types

use std::time::Duration;
use thiserror::Error;

use crate::error::{ErrorKind, GuideError};

/// Errors that can occur while talking to the generation API
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// HTTP status, when the API answered
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Translate into a user-facing error of the given kind
    pub fn into_guide_error(self, kind: ErrorKind) -> GuideError {
        GuideError::new(kind, self.to_string())
    }
}
