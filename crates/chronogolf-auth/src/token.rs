//! Client-credentials token request
//!
//! POSTs a JSON `client_credentials` grant to `{api_base}/oauth/token`.
//! The partner API does not use the authorization-code flow, so this is the
//! only token endpoint interaction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::GRANT_TYPE;
use crate::error::{Error, Result};

/// Response from the token endpoint.
///
/// `expires_in` is a delta in seconds from the response time. The caller
/// converts it to an absolute unix millisecond expiry when storing it.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
struct ClientCredentialsGrant<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Request a fresh access token with the client credentials grant.
///
/// Transport failures map to `Error::Http`, non-2xx responses to
/// `Error::Rejected` with the OAuth error text, and bodies without an
/// `access_token` to `Error::InvalidResponse`.
pub async fn request_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    timeout: Duration,
) -> Result<TokenResponse> {
    let response = client
        .post(token_url)
        .timeout(timeout)
        .json(&ClientCredentialsGrant {
            grant_type: GRANT_TYPE,
            client_id,
            client_secret,
        })
        .send()
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::Rejected {
            status: status.as_u16(),
            message: oauth_error_message(&body),
        });
    }

    let token = response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::InvalidResponse(e.to_string()))?;

    if token.access_token.is_empty() {
        return Err(Error::InvalidResponse("empty access_token".into()));
    }

    Ok(token)
}

/// Pull the most descriptive message out of an OAuth error body.
///
/// Prefers `error_description`, then `error`, then `message`; falls back to
/// the raw body when it is not JSON or has none of those fields.
fn oauth_error_message(body: &str) -> String {
    if body.trim().is_empty() {
        return String::from("<no body>");
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error_description", "error", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_owned))
        })
        .unwrap_or_else(|| body.to_owned())
}
