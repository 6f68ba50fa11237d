//! Client-side error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error returned by the analytics API.
///
/// Mirrors the `{ error: { status, message } }` shape of the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

/// Errors that can occur while calling the analytics API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Upstream answered with a non-success status.
    #[error("API error: {0}")]
    Api(ApiError),

    /// Connection failure, timeout or other transport problem.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a body that is not valid JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A route handler asked for a path parameter its pattern does not capture.
    #[error("Missing path parameter: {0}")]
    MissingParam(&'static str),
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type for API client operations.
pub type ClientResult<T> = Result<T, ClientError>;
