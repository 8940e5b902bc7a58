use std::collections::HashSet;

use archive_purge_core_types::{ArchivePrefix, PackageRecord};

/// Archive paths that must survive a purge, relative to the archive
/// directory, together with the packages that reference them.
///
/// `paths()[i]` is the archive of `retained()[i]`. Both sequences keep the
/// order in which packages were supplied.
#[derive(Clone, Debug, Default)]
pub struct ReferenceSet {
    paths: Vec<String>,
    retained: Vec<PackageRecord>,
    index: HashSet<String>,
}

impl ReferenceSet {
    /// Matching is a raw string prefix test on `dist_url` against
    /// `<prefix>/`. URLs outside the prefix belong to externally hosted
    /// archives and are ignored.
    pub fn build(packages: &[PackageRecord], prefix: &ArchivePrefix) -> Self {
        let pattern = prefix.url_pattern();
        let mut refs = Self::default();

        for package in packages {
            if !package.has_archive() {
                continue;
            }
            let Some(url) = package.dist_url.as_deref() else {
                continue;
            };
            let Some(relative) = url.strip_prefix(pattern.as_str()) else {
                continue;
            };
            refs.index.insert(relative.to_string());
            refs.paths.push(relative.to_string());
            refs.retained.push(package.clone());
        }

        refs
    }

    pub fn contains(&self, relative: &str) -> bool {
        self.index.contains(relative)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn retained(&self) -> &[PackageRecord] {
        &self.retained
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of distinct archive paths; smaller than `len()` when several
    /// packages share an archive.
    pub fn distinct_len(&self) -> usize {
        self.index.len()
    }
}
