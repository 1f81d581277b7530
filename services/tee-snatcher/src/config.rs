//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from LIGHTSPEED_CLIENT_SECRET or
//! client_secret_file and is never read from the TOML directly. The payment
//! token may live in the TOML but TEE_SNATCHER_PAYMENT_TOKEN overrides it.

use chronogolf_api::PlayerInfo;
use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Config file used when neither `--config` nor CONFIG_PATH is given.
pub const DEFAULT_CONFIG_FILE: &str = "tee-snatcher.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub monitor: MonitorConfig,
    pub metrics: MetricsConfig,
}

/// Partner API connection settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to LIGHTSPEED_CLIENT_SECRET)
    pub client_secret_file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: chronogolf_auth::DEFAULT_API_URL.to_string(),
            client_id: None,
            client_secret: None,
            client_secret_file: None,
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Tee time search window, `HH:MM` on both ends
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeRange {
    pub earliest: String,
    pub latest: String,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            earliest: "08:00".into(),
            latest: "16:00".into(),
        }
    }
}

/// Polling and booking settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub check_interval_ms: u64,
    pub max_attempts: u32,
    pub courses: Vec<String>,
    pub dates: Vec<String>,
    pub time_range: TimeRange,
    pub players: u32,
    pub per_page: u32,
    pub player_info: Vec<PlayerInfo>,
    pub payment_token: Secret<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 300_000,
            max_attempts: 288,
            courses: Vec::new(),
            dates: Vec::new(),
            time_range: TimeRange::default(),
            players: 4,
            per_page: 20,
            player_info: Vec::new(),
            payment_token: Secret::default(),
        }
    }
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

/// Prometheus exporter settings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Serve `/metrics` here when set; no exporter otherwise.
    pub listen_addr: Option<SocketAddr>,
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. LIGHTSPEED_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Like [`Config::load`], but a missing file yields the built-in defaults.
    pub fn load_or_default(path: &Path) -> common::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default().finish()
            }
            Err(e) => Err(e.into()),
        }
    }

    fn from_toml(contents: &str) -> common::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.finish()
    }

    fn finish(mut self) -> common::Result<Self> {
        self.apply_env()?;
        self.validate()?;

        if self.api.client_id.is_none() || self.api.client_secret.is_none() {
            warn!(
                "missing API credentials, set LIGHTSPEED_CLIENT_ID and LIGHTSPEED_CLIENT_SECRET"
            );
        }
        Ok(self)
    }

    fn apply_env(&mut self) -> common::Result<()> {
        if let Some(url) = non_empty_env("LIGHTSPEED_API_URL") {
            self.api.base_url = url;
        }
        if let Some(id) = non_empty_env("LIGHTSPEED_CLIENT_ID") {
            self.api.client_id = Some(id);
        }

        // Secret: env var takes precedence over file
        if let Some(secret) = non_empty_env("LIGHTSPEED_CLIENT_SECRET") {
            self.api.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = self.api.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                self.api.client_secret = Some(Secret::new(secret));
            }
        }

        if let Some(token) = non_empty_env("TEE_SNATCHER_PAYMENT_TOKEN") {
            self.monitor.payment_token = Secret::new(token);
        }
        Ok(())
    }

    fn validate(&self) -> common::Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.monitor.check_interval_ms == 0 {
            return Err(common::Error::Config(
                "check_interval_ms must be greater than 0".into(),
            ));
        }
        if self.monitor.players == 0 {
            return Err(common::Error::Config(
                "players must be greater than 0".into(),
            ));
        }
        if self.monitor.per_page == 0 {
            return Err(common::Error::Config(
                "per_page must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    ///
    /// The second value is true when the path was named explicitly, in which
    /// case a missing file is an error.
    pub fn resolve_path(cli_path: Option<&str>) -> (PathBuf, bool) {
        if let Some(p) = cli_path {
            return (PathBuf::from(p), true);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return (PathBuf::from(p), true);
        }
        (PathBuf::from(DEFAULT_CONFIG_FILE), false)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
