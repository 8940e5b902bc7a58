use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use archive_purge_core_types::PackageRecord;

use crate::metrics;
use crate::reference::ReferenceSet;
use crate::report::{PurgeEvent, PurgeReporter};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("remote store answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid remote response: {0}")]
    Invalid(String),
    #[error("{failed} remote deletions failed, first: {first}")]
    Partial { failed: usize, first: String },
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RemoteOutcome {
    pub deleted: Vec<String>,
    pub kept: usize,
}

/// A remote artifact store that mirrors the local archive directory.
///
/// Implementations diff `retained` against their own listing and delete
/// everything else.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    fn name(&self) -> &str;

    async fn delete_unneeded(
        &self,
        retained: &[PackageRecord],
    ) -> Result<RemoteOutcome, RemoteError>;
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteReport {
    #[default]
    Skipped,
    Reconciled {
        store: String,
        outcome: RemoteOutcome,
    },
    Failed {
        store: String,
        message: String,
    },
}

/// Hands the complete retained-package list to `store`. Whatever the store
/// fails with is reported once as a warning and never escalated.
pub async fn reconcile_remote(
    store: &dyn ArtifactStore,
    refs: &ReferenceSet,
    reporter: &dyn PurgeReporter,
) -> RemoteReport {
    match store.delete_unneeded(refs.retained()).await {
        Ok(outcome) => {
            reporter.report(PurgeEvent::RemoteReconciled {
                deleted: outcome.deleted.len(),
                kept: outcome.kept,
            });
            RemoteReport::Reconciled {
                store: store.name().to_string(),
                outcome,
            }
        }
        Err(err) => {
            metrics::record_remote_failure();
            let message = err.to_string();
            reporter.report(PurgeEvent::RemoteReconcileFailed {
                message: message.clone(),
            });
            RemoteReport::Failed {
                store: store.name().to_string(),
                message,
            }
        }
    }
}
