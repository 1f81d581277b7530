//! Shared types for the Tee Snatcher workspace

mod secret;
mod error;

pub use secret::Secret;
pub use error::{Error, Result};
