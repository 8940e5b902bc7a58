use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::model::{ArchiveEntry, EmptyReason, ScanOutcome};

/// Lists every regular file below `dir`. Symlinks are neither followed nor
/// reported. A missing or unreadable root, or a tree without files, yields
/// `ScanOutcome::Empty` rather than an error.
pub fn scan_archives(dir: &Path) -> ScanOutcome {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return ScanOutcome::Empty {
                reason: EmptyReason::Unreadable {
                    error: "not a directory".into(),
                },
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return ScanOutcome::Empty {
                reason: EmptyReason::Missing,
            }
        }
        Err(err) => {
            return ScanOutcome::Empty {
                reason: EmptyReason::Unreadable {
                    error: err.to_string(),
                },
            }
        }
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return ScanOutcome::Empty {
                    reason: EmptyReason::Unreadable {
                        error: err.to_string(),
                    },
                };
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable archive entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        entries.push(ArchiveEntry {
            relative: normalize(relative),
            absolute: entry.path().to_path_buf(),
        });
    }

    debug!(directory = %dir.display(), files = entries.len(), "archive scan finished");
    if entries.is_empty() {
        ScanOutcome::Empty {
            reason: EmptyReason::NoFiles,
        }
    } else {
        ScanOutcome::Found(entries)
    }
}

fn normalize(relative: &Path) -> String {
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = scan_archives(&dir.path().join("dist"));
        assert_eq!(
            outcome,
            ScanOutcome::Empty {
                reason: EmptyReason::Missing
            }
        );
    }

    #[test]
    fn directories_without_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        assert_eq!(
            scan_archives(dir.path()),
            ScanOutcome::Empty {
                reason: EmptyReason::NoFiles
            }
        );
    }

    #[test]
    fn relative_paths_use_forward_slashes_in_stable_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("vendor/pkg")).unwrap();
        std::fs::write(dir.path().join("vendor/pkg/b.zip"), b"b").unwrap();
        std::fs::write(dir.path().join("vendor/pkg/a.zip"), b"a").unwrap();
        std::fs::write(dir.path().join("top.tar"), b"t").unwrap();

        let ScanOutcome::Found(entries) = scan_archives(dir.path()) else {
            panic!("expected files");
        };
        let relative: Vec<_> = entries.iter().map(|e| e.relative.as_str()).collect();
        assert_eq!(relative, ["top.tar", "vendor/pkg/a.zip", "vendor/pkg/b.zip"]);
        assert_eq!(entries[0].absolute, dir.path().join("top.tar"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_reported() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("real.zip"), b"x").unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.zip"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.zip"), dir.path().join("link.zip"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked-dir")).unwrap();

        let ScanOutcome::Found(entries) = scan_archives(dir.path()) else {
            panic!("expected files");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].relative, "local.zip");
    }
}
