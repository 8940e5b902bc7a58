use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use archive_purge_core_types::{ArchivePrefix, PackageRecord};

use crate::errors::EngineError;
use crate::fs::{prune_empty_dirs, scan_archives, sweep_unreferenced};
use crate::metrics;
use crate::model::{
    EmptyReason, PruneReport, PurgeOutcome, PurgeSummary, ScanOutcome, SweepOptions, SweepReport,
};
use crate::reference::ReferenceSet;
use crate::remote::{reconcile_remote, ArtifactStore, RemoteReport};
use crate::report::{PurgeEvent, PurgeReporter, TracingReporter};

/// Levels below the archive directory that pruning descends into.
pub const DEFAULT_PRUNE_DEPTH: usize = 2;

#[derive(Clone, Copy, Debug)]
pub struct PurgeOptions {
    pub dry_run: bool,
    pub prune_depth: usize,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            prune_depth: DEFAULT_PRUNE_DEPTH,
        }
    }
}

/// One purge of an archive directory.
pub struct PurgeRun {
    archive_dir: PathBuf,
    prefix: ArchivePrefix,
    packages: Vec<PackageRecord>,
    options: PurgeOptions,
    store: Option<Arc<dyn ArtifactStore>>,
    reporter: Arc<dyn PurgeReporter>,
}

impl PurgeRun {
    pub fn new(
        archive_dir: impl Into<PathBuf>,
        prefix: ArchivePrefix,
        packages: Vec<PackageRecord>,
    ) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            prefix,
            packages,
            options: PurgeOptions::default(),
            store: None,
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_options(mut self, options: PurgeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn PurgeReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Runs reference build, scan, sweep and remote reconciliation (the last
    /// two concurrently), then prunes empty directories. Only a lost
    /// background task is an error; everything else ends up in the summary.
    pub async fn execute(self) -> Result<PurgeSummary, EngineError> {
        if self.archive_dir.as_os_str().is_empty() {
            return Err(EngineError::MissingArchiveDir);
        }
        metrics::record_run();
        let started_at = Utc::now();

        let refs = Arc::new(ReferenceSet::build(&self.packages, &self.prefix));
        debug!(
            referenced = refs.len(),
            distinct = refs.distinct_len(),
            packages = self.packages.len(),
            "reference set built"
        );

        let scan_dir = self.archive_dir.clone();
        let scan = tokio::task::spawn_blocking(move || scan_archives(&scan_dir)).await?;
        let entries = match scan {
            ScanOutcome::Found(entries) => entries,
            ScanOutcome::Empty { reason } => {
                self.reporter.report(PurgeEvent::NoArchivesFound {
                    directory: self.archive_dir.clone(),
                });
                return Ok(self.summary(
                    &refs,
                    PurgeOutcome::NoArchives,
                    Some(reason),
                    SweepReport::default(),
                    RemoteReport::Skipped,
                    PruneReport::default(),
                    started_at,
                ));
            }
        };

        let sweep = {
            let refs = Arc::clone(&refs);
            let reporter = Arc::clone(&self.reporter);
            let options = SweepOptions {
                dry_run: self.options.dry_run,
            };
            tokio::task::spawn_blocking(move || {
                sweep_unreferenced(&entries, &refs, options, reporter.as_ref())
            })
        };
        let remote = async {
            match (&self.store, self.options.dry_run) {
                (Some(store), false) => {
                    reconcile_remote(store.as_ref(), &refs, self.reporter.as_ref()).await
                }
                (Some(store), true) => {
                    debug!(store = store.name(), "dry run, remote reconciliation skipped");
                    RemoteReport::Skipped
                }
                (None, _) => RemoteReport::Skipped,
            }
        };
        let (sweep, remote) = tokio::join!(sweep, remote);
        let sweep = sweep?;

        let prune = if self.options.dry_run {
            PruneReport::default()
        } else {
            let root = self.archive_dir.clone();
            let depth = self.options.prune_depth;
            let reporter = Arc::clone(&self.reporter);
            tokio::task::spawn_blocking(move || {
                let (_, report) = prune_empty_dirs(&root, depth, reporter.as_ref());
                report
            })
            .await?
        };

        let outcome = if sweep.unreferenced == 0 {
            PurgeOutcome::NothingToPrune
        } else {
            PurgeOutcome::Swept
        };
        info!(
            removed = sweep.removed.len(),
            failed = sweep.failed.len(),
            directories = prune.removed.len(),
            "purge finished"
        );
        Ok(self.summary(&refs, outcome, None, sweep, remote, prune, started_at))
    }

    #[allow(clippy::too_many_arguments)]
    fn summary(
        &self,
        refs: &ReferenceSet,
        outcome: PurgeOutcome,
        empty_reason: Option<EmptyReason>,
        sweep: SweepReport,
        remote: RemoteReport,
        prune: PruneReport,
        started_at: chrono::DateTime<Utc>,
    ) -> PurgeSummary {
        PurgeSummary {
            archive_dir: self.archive_dir.clone(),
            prefix: self.prefix.to_string(),
            dry_run: self.options.dry_run,
            outcome,
            referenced: refs.len(),
            retained_packages: refs.retained().len(),
            empty_reason,
            sweep,
            remote,
            prune,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
