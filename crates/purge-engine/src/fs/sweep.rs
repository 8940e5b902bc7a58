use std::fs;

use crate::metrics;
use crate::model::{ArchiveEntry, RemovalFailure, SweepOptions, SweepReport};
use crate::reference::ReferenceSet;
use crate::report::{PurgeEvent, PurgeReporter};

/// Entries whose relative path is not referenced, in scan order.
pub fn unreferenced(entries: &[ArchiveEntry], refs: &ReferenceSet) -> Vec<ArchiveEntry> {
    entries
        .iter()
        .filter(|entry| !refs.contains(&entry.relative))
        .cloned()
        .collect()
}

/// Deletes every unreferenced entry. A failed removal is reported and the
/// sweep moves on to the next file.
pub fn sweep_unreferenced(
    entries: &[ArchiveEntry],
    refs: &ReferenceSet,
    options: SweepOptions,
    reporter: &dyn PurgeReporter,
) -> SweepReport {
    let targets = unreferenced(entries, refs);
    let mut report = SweepReport {
        scanned: entries.len(),
        unreferenced: targets.len(),
        ..SweepReport::default()
    };

    if targets.is_empty() {
        reporter.report(PurgeEvent::NothingToPrune);
        return report;
    }

    for entry in targets {
        if options.dry_run {
            reporter.report(PurgeEvent::ArchiveWouldBeRemoved {
                relative: entry.relative.clone(),
            });
            report.would_remove.push(entry.relative);
            continue;
        }

        match fs::remove_file(&entry.absolute) {
            Ok(()) => {
                metrics::record_archive_removed();
                reporter.report(PurgeEvent::ArchiveRemoved {
                    relative: entry.relative.clone(),
                });
                report.removed.push(entry.relative);
            }
            Err(err) => {
                metrics::record_archive_failure();
                reporter.report(PurgeEvent::ArchiveRemovalFailed {
                    relative: entry.relative.clone(),
                    error: err.to_string(),
                });
                report.failed.push(RemovalFailure {
                    path: entry.relative,
                    error: err.to_string(),
                });
            }
        }
    }

    report
}
