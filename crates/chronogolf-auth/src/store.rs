//! In-memory token record
//!
//! Holds the current bearer token and its margin-adjusted expiry. Only the
//! `Authenticator` writes to it; everyone else asks the authenticator.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::SAFETY_MARGIN;
use crate::token::TokenResponse;

/// Current unix time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Debug, Clone)]
struct TokenRecord {
    access_token: String,
    /// Unix millis after which the token is no longer used. Already has the
    /// safety margin subtracted from the server-declared lifetime.
    expires_at: u64,
    refresh_token: Option<String>,
}

/// Token state: empty (Unauthenticated) or holding a record (Authenticated
/// while the record is unexpired).
#[derive(Debug, Default)]
pub struct TokenStore {
    record: Option<TokenRecord>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token issued at `issued_at` (unix millis).
    ///
    /// Expiry is `issued_at + expires_in * 1000 - SAFETY_MARGIN`. Lifetimes
    /// shorter than the margin produce a token that is already stale.
    pub fn store(&mut self, response: &TokenResponse, issued_at: u64) {
        let lifetime = response.expires_in.saturating_mul(1000);
        let expires_at = issued_at
            .saturating_add(lifetime)
            .saturating_sub(SAFETY_MARGIN.as_millis() as u64);
        self.record = Some(TokenRecord {
            access_token: response.access_token.clone(),
            expires_at,
            refresh_token: response.refresh_token.clone(),
        });
    }

    /// Whether a token is held and `now` (unix millis) is before its expiry.
    pub fn is_valid_at(&self, now: u64) -> bool {
        self.record
            .as_ref()
            .is_some_and(|record| now < record.expires_at)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_millis())
    }

    /// The stored token, but only while it is valid at `now`.
    pub fn token_at(&self, now: u64) -> Option<&str> {
        self.record
            .as_ref()
            .filter(|record| now < record.expires_at)
            .map(|record| record.access_token.as_str())
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.record.as_ref().map(|record| record.expires_at)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.record
            .as_ref()
            .and_then(|record| record.refresh_token.as_deref())
    }

    /// Whether the stored token string equals `token`, regardless of expiry.
    pub fn holds(&self, token: &str) -> bool {
        self.record
            .as_ref()
            .is_some_and(|record| record.access_token == token)
    }

    /// Drop the stored token, refresh token and expiry.
    pub fn reset(&mut self) {
        self.record = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: "at_test".into(),
            token_type: Some("Bearer".into()),
            expires_in,
            refresh_token: Some("rt_test".into()),
        }
    }

    #[test]
    fn empty_store_is_invalid() {
        let store = TokenStore::new();
        assert!(!store.is_valid_at(0));
        assert!(store.token_at(0).is_none());
        assert!(store.expires_at().is_none());
    }

    #[test]
    fn expiry_subtracts_safety_margin() {
        let issued_at = 1_750_000_000_000;
        for lifetime in [301, 600, 3600, 86_400] {
            let mut store = TokenStore::new();
            store.store(&response(lifetime), issued_at);
            assert_eq!(
                store.expires_at(),
                Some(issued_at + lifetime * 1000 - 300_000),
                "lifetime {lifetime}s"
            );
        }
    }

    #[test]
    fn validity_boundary_is_exclusive() {
        let issued_at = 1_000_000;
        let mut store = TokenStore::new();
        store.store(&response(3600), issued_at);
        let expiry = store.expires_at().unwrap();

        assert!(store.is_valid_at(issued_at));
        assert!(store.is_valid_at(expiry - 1));
        assert!(!store.is_valid_at(expiry), "now == expiry must be invalid");
        assert!(!store.is_valid_at(expiry + 1));
        assert_eq!(store.token_at(expiry - 1), Some("at_test"));
        assert_eq!(store.token_at(expiry), None);
    }

    #[test]
    fn lifetime_within_margin_is_immediately_stale() {
        let issued_at = 1_000_000;
        let mut store = TokenStore::new();
        store.store(&response(120), issued_at);
        assert!(!store.is_valid_at(issued_at));
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = TokenStore::new();
        store.store(&response(3600), now_millis());
        assert!(store.is_valid());
        assert_eq!(store.refresh_token(), Some("rt_test"));
        assert!(store.holds("at_test"));

        store.reset();
        assert!(!store.is_valid());
        assert!(store.refresh_token().is_none());
        assert!(!store.holds("at_test"));
    }
}
