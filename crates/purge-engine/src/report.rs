use std::path::PathBuf;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

/// Something that happened during a purge, as seen by the presentation layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PurgeEvent {
    NoArchivesFound { directory: PathBuf },
    NothingToPrune,
    ArchiveRemoved { relative: String },
    ArchiveWouldBeRemoved { relative: String },
    ArchiveRemovalFailed { relative: String, error: String },
    RemoteReconciled { deleted: usize, kept: usize },
    RemoteReconcileFailed { message: String },
    DirectoryRemoved { path: PathBuf },
    DirectoryRemovalFailed { path: PathBuf, error: String },
    DirectoryUnreadable { path: PathBuf, error: String },
}

impl PurgeEvent {
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            PurgeEvent::NoArchivesFound { .. }
                | PurgeEvent::NothingToPrune
                | PurgeEvent::ArchiveRemovalFailed { .. }
                | PurgeEvent::RemoteReconcileFailed { .. }
                | PurgeEvent::DirectoryRemovalFailed { .. }
                | PurgeEvent::DirectoryUnreadable { .. }
        )
    }
}

/// Sink for purge events. Every component receives one explicitly.
pub trait PurgeReporter: Send + Sync {
    fn report(&self, event: PurgeEvent);
}

/// Forwards events to `tracing` only.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl PurgeReporter for TracingReporter {
    fn report(&self, event: PurgeEvent) {
        log_event(&event);
    }
}

pub fn log_event(event: &PurgeEvent) {
    match event {
        PurgeEvent::NoArchivesFound { directory } => {
            warn!(directory = %directory.display(), "no archives found");
        }
        PurgeEvent::NothingToPrune => warn!("no unreferenced archives found"),
        PurgeEvent::ArchiveRemoved { relative } => info!(archive = %relative, "removed archive"),
        PurgeEvent::ArchiveWouldBeRemoved { relative } => {
            info!(archive = %relative, "would remove archive")
        }
        PurgeEvent::ArchiveRemovalFailed { relative, error } => {
            warn!(archive = %relative, %error, "failed to remove archive")
        }
        PurgeEvent::RemoteReconciled { deleted, kept } => {
            info!(deleted, kept, "remote store reconciled")
        }
        PurgeEvent::RemoteReconcileFailed { message } => {
            warn!(%message, "remote reconciliation failed")
        }
        PurgeEvent::DirectoryRemoved { path } => {
            info!(path = %path.display(), "removed empty directory")
        }
        PurgeEvent::DirectoryRemovalFailed { path, error } => {
            warn!(path = %path.display(), %error, "failed to remove directory")
        }
        PurgeEvent::DirectoryUnreadable { path, error } => {
            warn!(path = %path.display(), %error, "directory could not be listed")
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<PurgeEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PurgeEvent> {
        self.events.lock().clone()
    }

    pub fn warnings(&self) -> Vec<PurgeEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.is_warning())
            .cloned()
            .collect()
    }
}

impl PurgeReporter for CollectingReporter {
    fn report(&self, event: PurgeEvent) {
        self.events.lock().push(event);
    }
}
