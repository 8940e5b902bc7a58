use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use archive_purge_engine::{ArtifactStore, PurgeOptions, PurgeRun, DEFAULT_PRUNE_DEPTH};
use clap::Args;
use tracing::{info, warn};

use crate::cli::context::CliContext;
use crate::cli::output::{print_summary, ConsoleReporter};
use crate::config::{load_repository_config, DEFAULT_CONFIG_FILE};
use crate::metadata::load_packages;
use crate::metrics::write_metrics_file;

#[derive(Args, Clone, Debug)]
pub struct PurgeArgs {
    /// Repository configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub file: PathBuf,

    /// Location of the built repository; defaults to the configured output-dir
    pub output_dir: Option<PathBuf>,

    /// Report what would be deleted without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip reconciliation with the remote artifact store
    #[arg(long)]
    pub no_remote: bool,

    /// How many levels below the archive directory empty directories are pruned
    #[arg(long, default_value_t = DEFAULT_PRUNE_DEPTH)]
    pub prune_depth: usize,
}

pub async fn cmd_purge(args: PurgeArgs, ctx: &CliContext) -> Result<()> {
    let loaded = load_repository_config(&args.file).await?;
    let prefix = loaded.archive_prefix()?;
    let output_dir = loaded.resolve_output_dir(args.output_dir.as_deref())?;

    let packages = load_packages(&output_dir)
        .await
        .with_context(|| format!("loading package metadata from {}", output_dir.display()))?;
    let archive_dir = output_dir.join(prefix.as_str());

    info!(
        archive_dir = %archive_dir.display(),
        packages = packages.len(),
        dry_run = args.dry_run,
        "purging archives"
    );

    let mut run = PurgeRun::new(&archive_dir, prefix, packages)
        .with_options(PurgeOptions {
            dry_run: args.dry_run,
            prune_depth: args.prune_depth,
        })
        .with_reporter(Arc::new(ConsoleReporter::new(ctx.output().clone())));

    if args.no_remote {
        info!("remote reconciliation disabled");
    } else if let Some(store) = loaded.nexus_store()? {
        let store: Arc<dyn ArtifactStore> = Arc::new(store);
        run = run.with_store(store);
    }

    let summary = run.execute().await.context("purge run aborted")?;
    if summary.has_failures() {
        warn!("purge finished with failures; see the messages above");
    }

    print_summary(ctx.output(), &summary)?;

    if let Some(path) = ctx.metrics_file() {
        write_metrics_file(path, &summary).await?;
    }

    Ok(())
}
