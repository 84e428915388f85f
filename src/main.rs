//! Saaty AHP CLI Entry Point
//!
//! This is the main entry point for the saaty-ahp command-line tool.

use anyhow::Context;
use clap::Parser;

use saaty_ahp::cli::{self, Cli};
use saaty_ahp::config::AppConfig;
use saaty_ahp::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    // Initialize logging
    telemetry::init(&config.logging).context("failed to initialize logging")?;

    let cli = Cli::parse();
    cli::execute(cli.command, &config).await
}
