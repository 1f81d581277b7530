//! Token lifecycle: obtain, cache, invalidate
//!
//! The `Authenticator` owns the `TokenStore` behind a tokio `Mutex`. The
//! validity check and the token request happen under the same lock, so
//! concurrent callers that find the store stale wait for the one in-flight
//! token request and then reuse its result instead of issuing their own.

use std::time::Duration;

use common::Secret;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_TIMEOUT, token_url};
use crate::error::Result;
use crate::store::{TokenStore, now_millis};
use crate::token::request_token;

/// Client-credentials authenticator for the partner API.
///
/// Created once at process start and shared (via `Arc`) with the request
/// executor for the lifetime of the process.
pub struct Authenticator {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: Secret<String>,
    timeout: Duration,
    store: Mutex<TokenStore>,
}

impl Authenticator {
    /// Build an authenticator for the API rooted at `api_base`.
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        client_id: impl Into<String>,
        client_secret: Secret<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url(api_base),
            client_id: client_id.into(),
            client_secret,
            timeout: DEFAULT_TIMEOUT,
            store: Mutex::new(TokenStore::new()),
        }
    }

    /// Override the token request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return a valid bearer token, requesting a new one only when the
    /// stored token is missing or within the safety margin of expiry.
    pub async fn get_token(&self) -> Result<String> {
        let mut store = self.store.lock().await;
        if let Some(token) = store.token_at(now_millis()) {
            return Ok(token.to_owned());
        }
        self.obtain_locked(&mut store).await
    }

    /// Unconditionally request a new token and store it.
    pub async fn obtain(&self) -> Result<String> {
        let mut store = self.store.lock().await;
        self.obtain_locked(&mut store).await
    }

    async fn obtain_locked(&self, store: &mut TokenStore) -> Result<String> {
        let issued_at = now_millis();
        debug!(token_url = %self.token_url, "requesting access token");

        match request_token(
            &self.client,
            &self.token_url,
            &self.client_id,
            self.client_secret.expose(),
            self.timeout,
        )
        .await
        {
            Ok(response) => {
                store.store(&response, issued_at);
                info!(
                    expires_in = response.expires_in,
                    has_refresh_token = response.refresh_token.is_some(),
                    "access token obtained"
                );
                Ok(response.access_token)
            }
            Err(e) => {
                warn!(error = %e, "token request failed");
                Err(e)
            }
        }
    }

    /// Whether a token is held and outside the safety margin.
    pub async fn is_valid(&self) -> bool {
        self.store.lock().await.is_valid()
    }

    /// Clear the stored token so the next `get_token()` re-authenticates.
    pub async fn reset(&self) {
        self.store.lock().await.reset();
        debug!("stored access token cleared");
    }

    /// Clear the stored token if it is still the one the server rejected.
    ///
    /// Returns false when another caller already replaced it, in which case
    /// the replacement is kept.
    pub async fn invalidate(&self, rejected: &str) -> bool {
        let mut store = self.store.lock().await;
        if store.holds(rejected) {
            store.reset();
            debug!("rejected access token cleared");
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
