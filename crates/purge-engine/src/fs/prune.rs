use std::fs;
use std::path::Path;

use tracing::warn;

use crate::metrics;
use crate::model::{PruneReport, RemovalFailure};
use crate::report::{PurgeEvent, PurgeReporter};

/// Removes directories below `root` that hold neither files nor surviving
/// subdirectories, deepest first. `depth` bounds how many levels below
/// `root` are descended into; `root` itself is never removed.
///
/// Returns whether `root` ended up empty.
pub fn prune_empty_dirs(
    root: &Path,
    depth: usize,
    reporter: &dyn PurgeReporter,
) -> (bool, PruneReport) {
    let mut report = PruneReport::default();
    let empty = prune_dir(root, depth, reporter, &mut report);
    (empty, report)
}

fn prune_dir(
    dir: &Path,
    depth: usize,
    reporter: &dyn PurgeReporter,
    report: &mut PruneReport,
) -> bool {
    let children = match fs::read_dir(dir) {
        Ok(children) => children,
        Err(err) => {
            reporter.report(PurgeEvent::DirectoryUnreadable {
                path: dir.to_path_buf(),
                error: err.to_string(),
            });
            return false;
        }
    };

    let mut empty = true;
    for child in children {
        let child = match child {
            Ok(child) => child,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "unreadable directory entry");
                empty = false;
                continue;
            }
        };
        // file_type() does not follow symlinks
        let is_dir = child.file_type().map(|kind| kind.is_dir()).unwrap_or(false);
        if !is_dir || depth == 0 {
            empty = false;
            continue;
        }

        let path = child.path();
        if !prune_dir(&path, depth - 1, reporter, report) {
            empty = false;
            continue;
        }
        match fs::remove_dir(&path) {
            Ok(()) => {
                metrics::record_directory_removed();
                reporter.report(PurgeEvent::DirectoryRemoved { path: path.clone() });
                report.removed.push(path);
            }
            Err(err) => {
                reporter.report(PurgeEvent::DirectoryRemovalFailed {
                    path: path.clone(),
                    error: err.to_string(),
                });
                report.failed.push(RemovalFailure {
                    path: path.display().to_string(),
                    error: err.to_string(),
                });
                empty = false;
            }
        }
    }

    empty
}
