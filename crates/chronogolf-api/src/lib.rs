//! Chrono Golf partner API client
//!
//! `ApiClient` executes bearer-authenticated JSON requests against the
//! partner API and re-authenticates once when a token is rejected with 401.
//! Resource accessors for courses, players, tee times and bookings are
//! inherent methods on `ApiClient`, grouped by module:
//!
//! - `courses`: list courses, course details, facilities
//! - `players`: list, fetch, create, update players
//! - `tee_times`: search tee times, book, fetch and cancel bookings
//!
//! Every accessor validates its required identifiers before touching the
//! network and returns `Error::Validation` when one is missing.

pub mod client;
pub mod courses;
pub mod error;
pub mod models;
pub mod pagination;
pub mod players;
pub mod tee_times;

#[cfg(test)]
mod test_support;

pub use client::{ApiClient, MAX_AUTH_ATTEMPTS, RequestDescriptor, query_pairs};
pub use courses::ListParams;
pub use error::{Error, Result};
pub use models::{Booking, BookingRequest, Course, Player, PlayerInfo, PlayerUpdate, TeeTime};
pub use pagination::{Page, Pagination};
pub use players::PlayerListParams;
pub use tee_times::TeeTimeQuery;
