//! Habit Tracker terminal client
//!
//! Layered on `habit-core`:
//! - cli: argument parsing
//! - config: config.json and overrides
//! - app: shared state (services, session, reminder feed)
//! - commands: one handler per command

mod app;
mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;

use app::AppState;
use cli::Cli;
use config::{default_data_dir, log_dir, AppConfig, LOG_APP_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

    // Logging failures should not stop the client
    if let Err(e) = rolling_logger::init_logger(log_dir(&data_dir), LOG_APP_NAME) {
        eprintln!("Logging disabled: {}", e);
    }
    let _ = rolling_logger::info(&format!("Habit tracker {} starting", env!("CARGO_PKG_VERSION")));

    let config = AppConfig::load(&data_dir)?.with_overrides(cli.api_url.clone(), cli.mock);
    tracing::info!(
        data_dir = %data_dir.display(),
        api = %config.api_base_url,
        mock = config.use_mock,
        "configuration loaded"
    );

    let state = AppState::open(&data_dir, config)?;
    match commands::dispatch(&state, cli.command).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("Command failed: {:#}", e));
            Err(e)
        }
    }
}
