//! Mark-and-sweep purge of unreferenced repository archives.
//!
//! The reference set is built once from package metadata and shared
//! read-only by the local sweep and the remote reconciler. Directory pruning
//! only starts after the local sweep has finished.

pub mod api;
pub mod errors;
pub mod fs;
pub mod metrics;
pub mod model;
pub mod reference;
pub mod remote;
pub mod report;

pub use api::{PurgeOptions, PurgeRun, DEFAULT_PRUNE_DEPTH};
pub use errors::EngineError;
pub use model::{ArchiveEntry, PurgeOutcome, PurgeSummary, ScanOutcome};
pub use reference::ReferenceSet;
pub use remote::{ArtifactStore, RemoteError, RemoteOutcome, RemoteReport};
pub use report::{CollectingReporter, PurgeEvent, PurgeReporter, TracingReporter};

pub use archive_purge_core_types::{ArchivePrefix, PackageRecord};

#[cfg(test)]
mod tests;
