use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::remote::RemoteReport;

/// A regular file found under the archive directory.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ArchiveEntry {
    /// Path relative to the archive directory, always `/`-separated.
    pub relative: String,
    pub absolute: PathBuf,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyReason {
    Missing,
    Unreadable { error: String },
    NoFiles,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScanOutcome {
    Empty { reason: EmptyReason },
    Found(Vec<ArchiveEntry>),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RemovalFailure {
    pub path: String,
    pub error: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SweepOptions {
    pub dry_run: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub unreferenced: usize,
    pub removed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub would_remove: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<RemovalFailure>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PruneReport {
    pub removed: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<RemovalFailure>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeOutcome {
    NoArchives,
    NothingToPrune,
    Swept,
}

/// End-of-run record handed to the presentation layer.
#[derive(Clone, Debug, Serialize)]
pub struct PurgeSummary {
    pub archive_dir: PathBuf,
    pub prefix: String,
    pub dry_run: bool,
    pub outcome: PurgeOutcome,
    pub referenced: usize,
    pub retained_packages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<EmptyReason>,
    pub sweep: SweepReport,
    pub remote: RemoteReport,
    pub prune: PruneReport,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PurgeSummary {
    pub fn removed_count(&self) -> usize {
        self.sweep.removed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.sweep.failed.is_empty()
            || !self.prune.failed.is_empty()
            || matches!(self.remote, RemoteReport::Failed { .. })
    }
}
