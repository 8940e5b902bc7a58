//! Prometheus export of a purge run, written in text exposition format so a
//! node exporter textfile collector can pick it up.

use std::path::Path;

use anyhow::{Context, Result};
use archive_purge_engine::metrics as engine_metrics;
use archive_purge_engine::{PurgeSummary, RemoteReport};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use tokio::fs;
use tracing::{error, info};

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

struct PurgeGauges {
    archives: IntGaugeVec,
    directories: IntGaugeVec,
    referenced: IntGauge,
    remote_failed: IntGauge,
    last_run: IntGauge,
}

static GAUGES: Lazy<PurgeGauges> = Lazy::new(|| {
    let gauges = PurgeGauges {
        archives: IntGaugeVec::new(
            Opts::new("archive_purge_archives", "Archives handled by the last purge"),
            &["state"],
        )
        .expect("static metric definition"),
        directories: IntGaugeVec::new(
            Opts::new(
                "archive_purge_directories",
                "Directories handled by the last purge",
            ),
            &["state"],
        )
        .expect("static metric definition"),
        referenced: IntGauge::new(
            "archive_purge_referenced_archives",
            "Archive paths referenced by package metadata",
        )
        .expect("static metric definition"),
        remote_failed: IntGauge::new(
            "archive_purge_remote_failed",
            "1 when remote reconciliation failed during the last purge",
        )
        .expect("static metric definition"),
        last_run: IntGauge::new(
            "archive_purge_last_run_timestamp_seconds",
            "Unix time the last purge finished",
        )
        .expect("static metric definition"),
    };
    let registry = global_registry();
    for collector in [
        Box::new(gauges.archives.clone()) as Box<dyn prometheus::core::Collector>,
        Box::new(gauges.directories.clone()),
        Box::new(gauges.referenced.clone()),
        Box::new(gauges.remote_failed.clone()),
        Box::new(gauges.last_run.clone()),
    ] {
        if let Err(err) = registry.register(collector) {
            error!(?err, "failed to register purge gauge");
        }
    }
    gauges
});

pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

pub fn record_summary(summary: &PurgeSummary) {
    let gauges = &*GAUGES;
    let counters = engine_metrics::snapshot();

    gauges
        .archives
        .with_label_values(&["scanned"])
        .set(summary.sweep.scanned as i64);
    gauges
        .archives
        .with_label_values(&["unreferenced"])
        .set(summary.sweep.unreferenced as i64);
    gauges
        .archives
        .with_label_values(&["removed"])
        .set(summary.sweep.removed.len() as i64);
    gauges
        .archives
        .with_label_values(&["failed"])
        .set(summary.sweep.failed.len() as i64);
    gauges
        .directories
        .with_label_values(&["removed"])
        .set(summary.prune.removed.len() as i64);
    gauges
        .directories
        .with_label_values(&["failed"])
        .set(summary.prune.failed.len() as i64);
    gauges.referenced.set(summary.referenced as i64);
    gauges
        .remote_failed
        .set(i64::from(matches!(summary.remote, RemoteReport::Failed { .. })));
    gauges.last_run.set(summary.finished_at.timestamp());

    tracing::debug!(
        runs = counters.runs,
        removed = counters.archives_removed,
        failures = counters.archive_failures,
        directories = counters.directories_removed,
        remote_failures = counters.remote_failures,
        "engine counters"
    );
}

pub fn render() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&global_registry().gather(), &mut buffer)
        .context("encoding prometheus metrics")?;
    String::from_utf8(buffer).context("prometheus output is not utf-8")
}

pub async fn write_metrics_file(path: &Path, summary: &PurgeSummary) -> Result<()> {
    record_summary(summary);
    let body = render()?;
    fs::write(path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote purge metrics");
    Ok(())
}
