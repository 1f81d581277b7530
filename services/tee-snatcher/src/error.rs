//! Service-specific error types

use thiserror::Error;

/// Tee snatcher lifecycle errors.
///
/// Per-tick failures (tee time queries, booking attempts) are logged and
/// absorbed by the monitor loop and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("missing API credentials: set {0}")]
    MissingCredentials(&'static str),

    #[error("failed to initialize authentication: {0}")]
    InitialAuth(#[from] chronogolf_auth::Error),
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;
