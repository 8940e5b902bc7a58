use super::config::cmd_config;
use super::env::CliArgs;
use super::purge::cmd_purge;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Purge(args) => cmd_purge(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
