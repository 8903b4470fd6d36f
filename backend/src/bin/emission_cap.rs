//! Emission cap command-line entry point.
//!
//! Runs the pipeline once: fetch the day's forecast, compute the cap, write
//! the snapshot and update the history, then print the report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin emission-cap
//! AIRSHED_CONFIG=./airshed.toml RUST_LOG=debug cargo run --bin emission-cap
//! ```
//!
//! # Environment Variables
//!
//! - `AIRSHED_CONFIG`: path of the TOML configuration file
//! - `AIRSHED_API_URL`: forecast endpoint override
//! - `AIRSHED_HTTP_TIMEOUT_SECS`: request timeout override
//! - `AIRSHED_SNAPSHOT_PATH`: snapshot file override
//! - `AIRSHED_HISTORY_PATH`: history file override
//! - `RUST_LOG`: log filter directives, e.g. `debug` or `airshed_cap=debug`
//!   (default: info)
//!
//! # Exit status
//!
//! `0` success, `1` setup failure, `2` forecast unavailable, `3` computation
//! failure, `4` snapshot or history could not be written.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use airshed_cap::db::JsonFileRepository;
use airshed_cap::report;
use airshed_cap::services::{AtmosphericSampler, RunCoordinator};
use airshed_cap::weather::OpenMeteoClient;
use airshed_cap::AppConfig;

const DEFAULT_LOG_FILTER: &str = "info";

/// Build the log filter from `RUST_LOG` directives, falling back to
/// `info` when they are missing or unparseable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting emission cap run");

    let config = AppConfig::load().context("loading configuration")?;
    let client = OpenMeteoClient::new(config.provider.api_url.clone(), config.timeout())
        .context("building forecast client")?;
    let sampler = AtmosphericSampler::new(
        client,
        config.provider.forecast_days,
        config.location.timezone.clone(),
    );
    let history = JsonFileRepository::new(config.output.history_path.clone());

    let mut coordinator = RunCoordinator::new(
        config.geographic_constants(),
        sampler,
        history,
        config.output.snapshot_path.clone(),
    );

    match coordinator.run().await {
        Ok(run) => {
            print!("{}", report::render(&run));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Emission cap run failed: {}", e);
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
