//! Transport-level errors for the tracker REST API.

use crate::domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("{method} {url} failed with {status} {status_text}: {message}")]
    Http {
        status: u16,
        status_text: String,
        method: String,
        url: String,
        message: String,
        body: Option<String>,
    },

    /// Request never got an answer (connect, DNS, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Answer could not be decoded into the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// No access token is available
    #[error("Not authenticated, please log in")]
    NotAuthenticated,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
