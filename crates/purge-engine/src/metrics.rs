use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct Counters {
    runs: AtomicU64,
    archives_removed: AtomicU64,
    archive_failures: AtomicU64,
    directories_removed: AtomicU64,
    remote_failures: AtomicU64,
}

static COUNTERS: Lazy<Counters> = Lazy::new(Counters::default);

fn increment(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub fn record_run() {
    increment(&COUNTERS.runs);
}

pub fn record_archive_removed() {
    increment(&COUNTERS.archives_removed);
}

pub fn record_archive_failure() {
    increment(&COUNTERS.archive_failures);
}

pub fn record_directory_removed() {
    increment(&COUNTERS.directories_removed);
}

pub fn record_remote_failure() {
    increment(&COUNTERS.remote_failures);
}

#[derive(Clone, Debug, Default)]
pub struct PurgeMetricsSnapshot {
    pub runs: u64,
    pub archives_removed: u64,
    pub archive_failures: u64,
    pub directories_removed: u64,
    pub remote_failures: u64,
}

pub fn snapshot() -> PurgeMetricsSnapshot {
    PurgeMetricsSnapshot {
        runs: COUNTERS.runs.load(Ordering::Relaxed),
        archives_removed: COUNTERS.archives_removed.load(Ordering::Relaxed),
        archive_failures: COUNTERS.archive_failures.load(Ordering::Relaxed),
        directories_removed: COUNTERS.directories_removed.load(Ordering::Relaxed),
        remote_failures: COUNTERS.remote_failures.load(Ordering::Relaxed),
    }
}
