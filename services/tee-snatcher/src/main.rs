//! Tee Snatcher
//!
//! Single-binary agent that:
//! 1. Authenticates against the Chrono Golf partner API
//! 2. Polls configured courses and dates for open tee times
//! 3. Books the first slot with enough spots (or simulates it in dry-run mode)
//! 4. Stops on a confirmed booking, after max_attempts checks, or on SIGINT/SIGTERM

mod cli;
mod config;
mod error;
mod metrics;
mod monitor;

use std::sync::Arc;

use anyhow::{Context, Result};
use chronogolf_api::ApiClient;
use chronogolf_auth::Authenticator;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Command;
use crate::config::Config;
use crate::error::Error;
use crate::monitor::{Monitor, MonitorExit};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match cli::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}\n\n{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    let (config_path, explicit) = Config::resolve_path(cli.config_path.as_deref());
    info!(path = %config_path.display(), "loading configuration");
    let config = if explicit {
        Config::load(&config_path)
    } else {
        Config::load_or_default(&config_path)
    }
    .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match cli.command {
        None => {
            println!("{}\n", cli::USAGE);
            println!("Effective configuration ({}):", config_path.display());
            println!("{config:#?}");
            Ok(())
        }
        Some(Command::Stop) => {
            info!("stop requested");
            println!(
                "No monitoring loop is running in this process. \
                 Send SIGINT or SIGTERM to a running `tee-snatcher start` to stop it."
            );
            Ok(())
        }
        Some(Command::Start { dry_run }) => start(config, dry_run).await,
    }
}

async fn start(config: Config, dry_run: bool) -> Result<()> {
    info!(
        base_url = %config.api.base_url,
        courses = config.monitor.courses.len(),
        dates = config.monitor.dates.len(),
        players = config.monitor.players,
        dry_run,
        "starting tee-snatcher"
    );

    if let Some(listen_addr) = config.metrics.listen_addr {
        metrics::install_exporter(listen_addr)?;
        info!(%listen_addr, "metrics exporter listening");
    }

    let client = build_client(&config)?;

    info!("initializing authentication with Chrono Golf API");
    if let Err(e) = client.authenticator().get_token().await {
        let e = Error::from(e);
        error!(error = %e, "authentication failed, not starting monitor");
        return Err(e.into());
    }
    info!("authentication initialized");

    let monitor = Monitor::new(Arc::new(client), config.monitor, dry_run);
    match monitor.run(shutdown_signal()).await {
        MonitorExit::Booked(booking) => {
            info!(booking_id = ?booking.id, status = ?booking.status, "tee time booked");
        }
        MonitorExit::AttemptsExhausted { attempts } => {
            info!(attempts, "no booking made before attempts ran out");
        }
        MonitorExit::Cancelled { attempts } => {
            info!(attempts, "shutdown complete");
        }
    }
    Ok(())
}

/// Build the shared HTTP client, authenticator and API client.
fn build_client(config: &Config) -> Result<ApiClient> {
    let api = &config.api;
    let client_id = api
        .client_id
        .clone()
        .ok_or(Error::MissingCredentials("LIGHTSPEED_CLIENT_ID"))?;
    let client_secret = api
        .client_secret
        .clone()
        .ok_or(Error::MissingCredentials("LIGHTSPEED_CLIENT_SECRET"))?;

    let http = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let auth = Authenticator::new(http.clone(), &api.base_url, client_id, client_secret)
        .with_timeout(api.timeout());
    Ok(ApiClient::new(http, api.base_url.clone(), Arc::new(auth)).with_timeout(api.timeout()))
}

/// Wait for SIGTERM or SIGINT for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
