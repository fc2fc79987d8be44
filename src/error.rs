//! Error types for the workdrive_upload crate.

use thiserror::Error;

/// Errors that can occur while uploading to Zoho WorkDrive.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("File already exists in folder: {0}")]
    Conflict(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Upload failed ({status}): {message}")]
    Upload { status: u16, message: String },

    #[error("Share failed ({status}): {message}")]
    Share { status: u16, message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),
}

impl ActionError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures (timeouts, connection resets) and 5xx responses
    /// are transient; 4xx responses and local errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ActionError::Http(err) => {
                err.is_timeout() || err.is_connect() || err.is_request()
            }
            ActionError::Upload { status, .. }
            | ActionError::Share { status, .. }
            | ActionError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for ActionError.
pub type Result<T> = std::result::Result<T, ActionError>;
