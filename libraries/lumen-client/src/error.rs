//! Error types for the Lumen documents client.

use thiserror::Error;

/// Errors that can occur when talking to the documents backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed (connection refused, reset, timed out)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status and no readable body
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server decoded the request but reported `success: false`
    #[error("Rejected by server: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Rejected { reason: Option<String> },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error while reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Reason supplied by the server for an application-level failure.
    ///
    /// Transport and parse failures have no server reason and return `None`.
    pub fn user_reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { reason } => reason.as_deref(),
            _ => None,
        }
    }

    /// Whether the backend understood the request and refused it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
