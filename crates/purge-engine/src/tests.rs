use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{PurgeOptions, PurgeRun};
use crate::model::{EmptyReason, PurgeOutcome};
use crate::remote::{ArtifactStore, RemoteError, RemoteOutcome, RemoteReport};
use crate::report::{CollectingReporter, PurgeEvent};
use archive_purge_core_types::{ArchivePrefix, PackageRecord};

struct UnreachableStore;

#[async_trait]
impl ArtifactStore for UnreachableStore {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn delete_unneeded(
        &self,
        _retained: &[PackageRecord],
    ) -> Result<RemoteOutcome, RemoteError> {
        Err(RemoteError::Transport("connection refused".into()))
    }
}

#[derive(Default)]
struct CountingStore {
    calls: AtomicUsize,
}

#[async_trait]
impl ArtifactStore for CountingStore {
    fn name(&self) -> &str {
        "counting"
    }

    async fn delete_unneeded(
        &self,
        retained: &[PackageRecord],
    ) -> Result<RemoteOutcome, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteOutcome {
            deleted: Vec::new(),
            kept: retained.len(),
        })
    }
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"archive").unwrap();
}

fn packages() -> Vec<PackageRecord> {
    vec![PackageRecord::new("acme/a", "1.0").with_dist("zip", "dist/a/a-1.0.zip")]
}

fn run(dist: &Path, reporter: &Arc<CollectingReporter>) -> PurgeRun {
    PurgeRun::new(dist, ArchivePrefix::new("dist").unwrap(), packages())
        .with_reporter(reporter.clone())
}

#[tokio::test]
async fn unreferenced_archive_and_its_directory_are_removed() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    touch(&dist, "a/a-1.0.zip");
    touch(&dist, "b/old-0.1.zip");

    let reporter = Arc::new(CollectingReporter::new());
    let summary = run(&dist, &reporter).execute().await.unwrap();

    assert_eq!(summary.outcome, PurgeOutcome::Swept);
    assert_eq!(summary.sweep.removed, ["b/old-0.1.zip"]);
    assert!(dist.join("a/a-1.0.zip").exists());
    assert!(dist.join("a").is_dir());
    assert!(!dist.join("b").exists());
    assert_eq!(summary.prune.removed, vec![dist.join("b")]);
    assert!(reporter.warnings().is_empty());
}

#[tokio::test]
async fn missing_archive_directory_is_a_successful_no_op() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");

    let reporter = Arc::new(CollectingReporter::new());
    let summary = run(&dist, &reporter)
        .with_store(Arc::new(UnreachableStore))
        .execute()
        .await
        .unwrap();

    assert_eq!(summary.outcome, PurgeOutcome::NoArchives);
    assert_eq!(summary.empty_reason, Some(EmptyReason::Missing));
    assert_eq!(summary.removed_count(), 0);
    assert_eq!(summary.remote, RemoteReport::Skipped);
    assert_eq!(
        reporter.events(),
        vec![PurgeEvent::NoArchivesFound { directory: dist }]
    );
}

#[tokio::test]
async fn fully_referenced_tree_deletes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    touch(&dist, "a/a-1.0.zip");

    let reporter = Arc::new(CollectingReporter::new());
    let summary = run(&dist, &reporter).execute().await.unwrap();

    assert_eq!(summary.outcome, PurgeOutcome::NothingToPrune);
    assert_eq!(summary.removed_count(), 0);
    assert!(dist.join("a/a-1.0.zip").exists());
    assert!(reporter.events().contains(&PurgeEvent::NothingToPrune));
}

#[tokio::test]
async fn remote_failure_does_not_affect_local_sweep() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    touch(&dist, "a/a-1.0.zip");
    touch(&dist, "b/old-0.1.zip");

    let reporter = Arc::new(CollectingReporter::new());
    let summary = run(&dist, &reporter)
        .with_store(Arc::new(UnreachableStore))
        .execute()
        .await
        .unwrap();

    assert_eq!(summary.sweep.removed, ["b/old-0.1.zip"]);
    assert!(!dist.join("b").exists());
    assert!(matches!(summary.remote, RemoteReport::Failed { .. }));
    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        PurgeEvent::RemoteReconcileFailed { message } if message.contains("connection refused")
    ));
}

#[tokio::test]
async fn deep_empty_directories_survive_the_depth_bound() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    touch(&dist, "a/a-1.0.zip");
    std::fs::create_dir_all(dist.join("x/y/z")).unwrap();

    let reporter = Arc::new(CollectingReporter::new());
    let summary = run(&dist, &reporter).execute().await.unwrap();

    assert!(dist.join("x/y/z").is_dir());
    assert!(summary.prune.removed.is_empty());
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    touch(&dist, "a/a-1.0.zip");
    touch(&dist, "b/old-0.1.zip");
    touch(&dist, "c/d/older-0.0.1.zip");

    let reporter = Arc::new(CollectingReporter::new());
    let first = run(&dist, &reporter).execute().await.unwrap();
    assert_eq!(first.removed_count(), 2);

    let second = run(&dist, &reporter).execute().await.unwrap();
    assert_eq!(second.removed_count(), 0);
    assert_eq!(second.outcome, PurgeOutcome::NothingToPrune);
}

#[tokio::test]
async fn dry_run_touches_nothing() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    touch(&dist, "a/a-1.0.zip");
    touch(&dist, "b/old-0.1.zip");

    let reporter = Arc::new(CollectingReporter::new());
    let summary = run(&dist, &reporter)
        .with_store(Arc::new(UnreachableStore))
        .with_options(PurgeOptions {
            dry_run: true,
            ..PurgeOptions::default()
        })
        .execute()
        .await
        .unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.sweep.would_remove, ["b/old-0.1.zip"]);
    assert!(dist.join("b/old-0.1.zip").exists());
    assert_eq!(summary.remote, RemoteReport::Skipped);
    assert!(summary.prune.removed.is_empty());
}

#[tokio::test]
async fn dry_run_never_contacts_the_remote_store() {
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    touch(&dist, "a/a-1.0.zip");
    touch(&dist, "b/old-0.1.zip");

    let store = Arc::new(CountingStore::default());
    let reporter = Arc::new(CollectingReporter::new());
    let dry = run(&dist, &reporter)
        .with_store(store.clone())
        .with_options(PurgeOptions {
            dry_run: true,
            ..PurgeOptions::default()
        })
        .execute()
        .await
        .unwrap();

    assert_eq!(dry.remote, RemoteReport::Skipped);
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    let live = run(&dist, &reporter)
        .with_store(store.clone())
        .execute()
        .await
        .unwrap();

    assert!(matches!(live.remote, RemoteReport::Reconciled { .. }));
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}
