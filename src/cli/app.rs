use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::init_logging;

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;

    info!(
        "Starting archive-purge v{} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("ARCHIVE_PURGE_GIT_HASH"),
        env!("ARCHIVE_PURGE_BUILD_DATE")
    );

    let cli_context = CliContext::new(cli.output.clone(), cli.metrics_file.clone());

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
