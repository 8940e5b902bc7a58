//! Reads the package list a Satis build wrote to its output directory.
//!
//! `packages.json` either inlines packages or points at include files via
//! its `includes` object. Include files hold
//! `{"packages": {"vendor/name": {"1.0.0": {...}}}}`; the list form
//! `{"vendor/name": [{...}]}` is accepted too.

use std::path::{Path, PathBuf};

use archive_purge_core_types::PackageRecord;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

pub const ROOT_FILE: &str = "packages.json";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("no packages.json found in {0}; build the repository first")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Inline packages first, then each include in key order.
pub async fn load_packages(output_dir: &Path) -> Result<Vec<PackageRecord>, MetadataError> {
    let root_path = output_dir.join(ROOT_FILE);
    if !fs::try_exists(&root_path).await.unwrap_or(false) {
        return Err(MetadataError::NotFound(output_dir.to_path_buf()));
    }
    let root = read_json(&root_path).await?;

    let mut packages = Vec::new();
    if let Some(inline) = root.get("packages") {
        collect_packages(inline, &mut packages);
    }

    let mut includes: Vec<&String> = root
        .get("includes")
        .and_then(Value::as_object)
        .map(|map| map.keys().collect())
        .unwrap_or_default();
    includes.sort();

    for include in includes {
        let path = output_dir.join(include);
        let document = read_json(&path).await?;
        let before = packages.len();
        if let Some(listed) = document.get("packages") {
            collect_packages(listed, &mut packages);
        }
        debug!(include = %include, packages = packages.len() - before, "loaded include");
    }

    info!(
        output_dir = %output_dir.display(),
        packages = packages.len(),
        "loaded package metadata"
    );
    Ok(packages)
}

async fn read_json(path: &Path) -> Result<Value, MetadataError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|err| MetadataError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn collect_packages(value: &Value, out: &mut Vec<PackageRecord>) {
    // an empty `packages: []` is what Satis writes when everything lives in includes
    let Some(by_name) = value.as_object() else {
        return;
    };
    for (name, versions) in by_name {
        match versions {
            Value::Object(map) => {
                for (version, package) in map {
                    out.push(to_record(name, Some(version), package));
                }
            }
            Value::Array(list) => {
                for package in list {
                    out.push(to_record(name, None, package));
                }
            }
            _ => debug!(package = %name, "ignoring malformed package entry"),
        }
    }
}

fn to_record(name: &str, version_key: Option<&String>, package: &Value) -> PackageRecord {
    let fields = package.as_object();
    let text = |map: Option<&Map<String, Value>>, key: &str| {
        map.and_then(|map| map.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let dist = fields
        .and_then(|map| map.get("dist"))
        .and_then(Value::as_object);

    PackageRecord {
        name: text(fields, "name").or_else(|| Some(name.to_string())),
        version: text(fields, "version").or_else(|| version_key.cloned()),
        dist_type: text(dist, "type"),
        dist_url: text(dist, "url"),
    }
}
