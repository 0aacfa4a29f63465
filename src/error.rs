//! Error types for the offline shell
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::shell::Phase;

// == Shell Error Enum ==
/// Unified error type for the offline shell.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream could not be reached at all
    #[error("Network error: {0}")]
    Network(String),

    /// A manifest asset answered with a non-success status during install
    #[error("Asset {path} unavailable (status {status})")]
    AssetUnavailable { path: String, status: u16 },

    /// Lifecycle transition not allowed from the current phase
    #[error("Generation {generation} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        generation: String,
        from: Option<Phase>,
        to: Phase,
    },

    /// Cache store refused or failed an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShellError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ShellError::Network(_) | ShellError::AssetUnavailable { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ShellError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ShellError::Storage(_) | ShellError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for ShellError {
    fn from(err: reqwest::Error) -> Self {
        ShellError::Network(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the offline shell.
pub type Result<T> = std::result::Result<T, ShellError>;
