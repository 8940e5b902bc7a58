//! archive-purge library
//!
//! Exposes the command line and its loaders for integration testing

pub mod cli;
pub mod config;
pub mod metadata;
pub mod metrics;

// Re-export commonly used types for external use
pub use archive_purge_engine::{PurgeOptions, PurgeRun, PurgeSummary};
pub use config::{load_repository_config, ConfigError, LoadedConfig, RepositoryConfig};
pub use metadata::{load_packages, MetadataError};
