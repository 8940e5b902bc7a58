use std::fmt;

use thiserror::Error;

/// Shared error type for the archive-purge crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PurgeCoreError {
    #[error("archive prefix must not be empty")]
    EmptyPrefix,
}

/// One package version as published in the repository metadata.
///
/// The purge core only looks at `dist_type` and `dist_url`; `name` and
/// `version` ride along for reporting and for remote stores that index by
/// component coordinates.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PackageRecord {
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub version: Option<String>,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub dist_type: Option<String>,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub dist_url: Option<String>,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            ..Self::default()
        }
    }

    pub fn with_dist(mut self, dist_type: impl Into<String>, dist_url: impl Into<String>) -> Self {
        self.dist_type = Some(dist_type.into());
        self.dist_url = Some(dist_url.into());
        self
    }

    /// Archive-backed packages carry a non-empty dist type.
    pub fn has_archive(&self) -> bool {
        self.dist_type
            .as_deref()
            .map(|kind| !kind.is_empty())
            .unwrap_or(false)
    }

    /// Last `/` segment of the dist URL, if any.
    pub fn archive_file_name(&self) -> Option<&str> {
        let url = self.dist_url.as_deref()?;
        let name = url.rsplit('/').next()?;
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// Archive subdirectory relative to the repository output root, e.g. `dist`.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ArchivePrefix(String);

impl ArchivePrefix {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PurgeCoreError> {
        let trimmed = raw.as_ref().trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(PurgeCoreError::EmptyPrefix);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw string pattern a dist URL must start with: `<prefix>/`.
    pub fn url_pattern(&self) -> String {
        format!("{}/", self.0)
    }
}

impl fmt::Display for ArchivePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
