//! Error types for API operations

use serde_json::Value;

/// Errors from partner API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token endpoint refused us or could not be reached.
    #[error(transparent)]
    AuthenticationFailed(#[from] chronogolf_auth::Error),

    /// Non-2xx response (`status` set) or transport failure (`status` unset).
    #[error("API request failed: {message}")]
    ApiRequestFailed {
        status: Option<u16>,
        message: String,
        details: Option<Value>,
    },

    /// A required caller-supplied field was missing. No request was sent.
    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Build an `ApiRequestFailed` from a non-2xx status and its raw body.
    ///
    /// JSON bodies are kept as structured details; anything else is kept as
    /// a string.
    pub fn from_status(status: u16, body: &str) -> Self {
        let details = if body.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.to_owned())),
            )
        };
        let message = match &details {
            Some(details) => format!("status {status}, details: {details}"),
            None => format!("status {status}"),
        };
        Error::ApiRequestFailed {
            status: Some(status),
            message,
            details,
        }
    }

    /// Build an `ApiRequestFailed` for a request that never got a response.
    pub fn transport(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        Error::ApiRequestFailed {
            status: None,
            message,
            details: None,
        }
    }

    /// Build an `ApiRequestFailed` for a 2xx body we could not decode.
    pub fn decode(status: u16, err: impl std::fmt::Display) -> Self {
        Error::ApiRequestFailed {
            status: Some(status),
            message: format!("invalid response body: {err}"),
            details: None,
        }
    }

    /// HTTP status associated with the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AuthenticationFailed(e) => e.status(),
            Error::ApiRequestFailed { status, .. } => *status,
            Error::Validation(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::ApiRequestFailed { status: Some(401), .. })
    }
}

/// Fail with `Error::Validation` when `value` is blank.
pub(crate) fn require<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{what} is required")));
    }
    Ok(value)
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;
