use std::collections::HashSet;

use archive_purge_core_types::PackageRecord;

use crate::model::Component;

/// What the retained packages pin on the remote side.
#[derive(Debug, Default)]
pub struct NeededSet {
    file_names: HashSet<String>,
    coordinates: HashSet<(String, String)>,
}

impl NeededSet {
    pub fn from_retained(retained: &[PackageRecord]) -> Self {
        let mut needed = Self::default();
        for package in retained {
            if let Some(file) = package.archive_file_name() {
                needed.file_names.insert(file.to_string());
            }
            if let (Some(name), Some(version)) = (&package.name, &package.version) {
                needed
                    .coordinates
                    .insert((name.to_ascii_lowercase(), version.clone()));
            }
        }
        needed
    }

    /// A component survives when one of its assets carries a retained
    /// archive file name or its coordinates match a retained package.
    pub fn is_needed(&self, component: &Component) -> bool {
        if component
            .assets
            .iter()
            .any(|asset| self.file_names.contains(asset.file_name()))
        {
            return true;
        }
        match (component.full_name(), component.version.as_ref()) {
            (Some(name), Some(version)) => self
                .coordinates
                .contains(&(name.to_ascii_lowercase(), version.clone())),
            _ => false,
        }
    }
}
