//! Error types for token acquisition
//!
//! Every variant is an authentication failure: the stored token is left
//! untouched and the caller's request cannot proceed.

/// Errors from the token endpoint.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authentication failed: token request failed: {0}")]
    Http(String),

    #[error("authentication failed: token endpoint returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("authentication failed: invalid token response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// HTTP status returned by the token endpoint, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Rejected { status, .. } => Some(*status),
            Error::Http(_) | Error::InvalidResponse(_) => None,
        }
    }
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
