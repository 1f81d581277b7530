//! Chrono Golf OAuth client-credentials authentication
//!
//! Obtains bearer tokens for the Lightspeed Golf (Chrono Golf) partner API
//! and keeps the current one in memory until it comes within the safety
//! margin of its expiry.
//!
//! Token flow:
//! 1. Caller builds one `Authenticator` at startup with the credential pair
//! 2. `Authenticator::get_token()` returns the stored token while it is valid
//! 3. Otherwise it POSTs a `client_credentials` grant via `token::request_token()`
//! 4. The response is recorded in the `TokenStore` with the margin applied
//! 5. A 401 from the API invalidates the stored token so the next call re-authenticates

pub mod authenticator;
pub mod constants;
pub mod error;
pub mod store;
pub mod token;

pub use authenticator::Authenticator;
pub use constants::*;
pub use error::{Error, Result};
pub use store::{TokenStore, now_millis};
pub use token::{TokenResponse, request_token};
