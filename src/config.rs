//! Repository configuration (`satis.json` or a YAML equivalent).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use archive_purge_core_types::ArchivePrefix;
use archive_purge_nexus::{NexusArtifactStore, NexusConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "./satis.json";
pub const NEXUS_PASSWORD_ENV: &str = "ARCHIVE_PURGE_NEXUS_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("You must define \"archive\" parameter in your {0}")]
    MissingArchive(PathBuf),
    #[error("The output dir must be specified as second argument or be configured inside {0}")]
    MissingOutputDir(PathBuf),
    #[error("invalid nexus configuration: {0}")]
    Nexus(String),
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RepositoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "output-dir", skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nexus: Option<NexusSettings>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ArchiveSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NexusSettings {
    pub url: String,
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// humantime duration such as `30s` or `2m`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Configuration together with the file it came from.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: RepositoryConfig,
    pub path: PathBuf,
}

pub async fn load_repository_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let config = parse_config(path, &raw)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
    })
}

fn parse_config(path: &Path, raw: &str) -> Result<RepositoryConfig, ConfigError> {
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str(raw).map_err(|err| err.to_string())
    } else {
        serde_json::from_str(raw).map_err(|err| err.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

impl LoadedConfig {
    pub fn archive_prefix(&self) -> Result<ArchivePrefix, ConfigError> {
        self.config
            .archive
            .as_ref()
            .and_then(|archive| archive.directory.as_deref())
            .and_then(|directory| ArchivePrefix::new(directory).ok())
            .ok_or_else(|| ConfigError::MissingArchive(self.path.clone()))
    }

    /// Command line wins over the configured `output-dir`.
    pub fn resolve_output_dir(&self, cli: Option<&Path>) -> Result<PathBuf, ConfigError> {
        cli.map(Path::to_path_buf)
            .or_else(|| self.config.output_dir.clone())
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::MissingOutputDir(self.path.clone()))
    }

    pub fn nexus_config(&self) -> Result<Option<NexusConfig>, ConfigError> {
        let Some(settings) = &self.config.nexus else {
            return Ok(None);
        };
        let mut config = NexusConfig::new(&settings.url, settings.repository.clone())
            .map_err(|err| ConfigError::Nexus(err.to_string()))?;
        if let Some(raw) = settings.timeout.as_deref() {
            config = config.with_timeout(parse_timeout(raw)?);
        }
        if let Some(username) = &settings.username {
            let password = env::var(NEXUS_PASSWORD_ENV)
                .ok()
                .filter(|value| !value.is_empty())
                .or_else(|| settings.password.clone());
            config = config.with_credentials(username.clone(), password);
        }
        debug!(url = %config.base_url, repository = %config.repository, "nexus configured");
        Ok(Some(config))
    }

    pub fn nexus_store(&self) -> Result<Option<NexusArtifactStore>, ConfigError> {
        self.nexus_config()?
            .map(|config| {
                NexusArtifactStore::new(config).map_err(|err| ConfigError::Nexus(err.to_string()))
            })
            .transpose()
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw)
        .map_err(|err| ConfigError::Nexus(format!("timeout {raw:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn loaded(raw: &str) -> LoadedConfig {
        let path = PathBuf::from("satis.json");
        LoadedConfig {
            config: parse_config(&path, raw).unwrap(),
            path,
        }
    }

    #[test]
    fn parses_satis_json_and_ignores_unknown_keys() {
        let config = loaded(
            r#"{
                "name": "acme/mirror",
                "homepage": "https://packages.example",
                "repositories": [{"type": "composer", "url": "https://repo.packagist.org"}],
                "require-all": true,
                "output-dir": "web",
                "archive": {"directory": "dist", "format": "zip", "skip-dev": true}
            }"#,
        );
        assert_eq!(config.archive_prefix().unwrap().as_str(), "dist");
        assert_eq!(
            config.resolve_output_dir(None).unwrap(),
            PathBuf::from("web")
        );
        assert_eq!(
            config.resolve_output_dir(Some(Path::new("/srv/out"))).unwrap(),
            PathBuf::from("/srv/out")
        );
    }

    #[test]
    fn yaml_files_are_supported() {
        let path = PathBuf::from("satis.yaml");
        let config = parse_config(&path, "archive:\n  directory: dist\noutput-dir: web\n").unwrap();
        assert_eq!(config.archive.unwrap().directory.as_deref(), Some("dist"));
    }

    #[test]
    fn missing_archive_directory_is_a_precondition_failure() {
        for raw in [
            r#"{"output-dir": "web"}"#,
            r#"{"archive": {}}"#,
            r#"{"archive": {"directory": ""}}"#,
        ] {
            let config = loaded(raw);
            assert!(matches!(
                config.archive_prefix(),
                Err(ConfigError::MissingArchive(_))
            ));
        }
    }

    #[test]
    fn output_dir_must_come_from_somewhere() {
        let config = loaded(r#"{"archive": {"directory": "dist"}}"#);
        assert!(matches!(
            config.resolve_output_dir(None),
            Err(ConfigError::MissingOutputDir(_))
        ));
    }

    #[test]
    fn malformed_json_reports_the_file() {
        let err = parse_config(Path::new("satis.json"), "{").unwrap_err();
        assert!(err.to_string().contains("satis.json"));
    }

    #[test]
    #[serial]
    fn nexus_password_prefers_environment() {
        let config = loaded(
            r#"{
                "archive": {"directory": "dist"},
                "nexus": {"url": "https://nexus.example", "repository": "composer",
                          "username": "svc", "password": "from-file", "timeout": "5s"}
            }"#,
        );

        env::remove_var(NEXUS_PASSWORD_ENV);
        let nexus = config.nexus_config().unwrap().unwrap();
        assert_eq!(nexus.password.as_deref(), Some("from-file"));
        assert_eq!(nexus.timeout, Duration::from_secs(5));

        env::set_var(NEXUS_PASSWORD_ENV, "from-env");
        let nexus = config.nexus_config().unwrap().unwrap();
        assert_eq!(nexus.password.as_deref(), Some("from-env"));
        env::remove_var(NEXUS_PASSWORD_ENV);
    }

    #[test]
    fn invalid_nexus_timeout_is_rejected() {
        let config = loaded(
            r#"{"nexus": {"url": "https://nexus.example", "repository": "composer", "timeout": "soon"}}"#,
        );
        assert!(matches!(config.nexus_config(), Err(ConfigError::Nexus(_))));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_repository_config(&dir.path().join("satis.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
