//! Chrono Golf API constants

use std::time::Duration;

/// Default partner API base URL (overridable via `LIGHTSPEED_API_URL`)
pub const DEFAULT_API_URL: &str = "https://api.chronogolf.com/v2";

/// Token endpoint path, relative to the API base URL
pub const TOKEN_PATH: &str = "/oauth/token";

/// OAuth grant used for partner access
pub const GRANT_TYPE: &str = "client_credentials";

/// Tokens are treated as expired this long before the server-declared expiry
/// so a request is never sent with a token that lapses mid-flight.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Timeout applied to token and resource requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Join the API base URL and the token endpoint path.
pub fn token_url(api_base: &str) -> String {
    format!("{}{TOKEN_PATH}", api_base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_url_joins_base_and_path() {
        assert_eq!(
            token_url(DEFAULT_API_URL),
            "https://api.chronogolf.com/v2/oauth/token"
        );
        assert_eq!(
            token_url("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/oauth/token"
        );
    }

    #[test]
    fn safety_margin_is_five_minutes() {
        assert_eq!(SAFETY_MARGIN.as_millis(), 300_000);
    }
}
