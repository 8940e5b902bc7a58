//! Nexus Repository Manager 3 backend for remote archive reconciliation.

pub mod client;
pub mod config;
pub mod errors;
pub mod model;
pub mod selection;

pub use client::NexusArtifactStore;
pub use config::NexusConfig;
pub use errors::NexusError;
