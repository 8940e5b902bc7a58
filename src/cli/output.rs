use anyhow::Result;
use archive_purge_engine::{PurgeEvent, PurgeOutcome, PurgeReporter, PurgeSummary};
use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

/// Prints one line per purge event in human mode and stays quiet otherwise,
/// leaving the structured summary as the only stdout output.
pub struct ConsoleReporter {
    format: OutputFormat,
}

impl ConsoleReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl PurgeReporter for ConsoleReporter {
    fn report(&self, event: PurgeEvent) {
        debug!(?event, "purge event");
        if self.format == OutputFormat::Human {
            println!("{}", human_line(&event));
        }
    }
}

pub fn human_line(event: &PurgeEvent) -> String {
    match event {
        PurgeEvent::NoArchivesFound { directory } => {
            format!("No archives found under {}.", directory.display())
        }
        PurgeEvent::NothingToPrune => "No unreferenced archives found.".to_string(),
        PurgeEvent::ArchiveRemoved { relative } => format!("Removed archive: {relative}"),
        PurgeEvent::ArchiveWouldBeRemoved { relative } => {
            format!("Would remove archive: {relative}")
        }
        PurgeEvent::ArchiveRemovalFailed { relative, error } => {
            format!("Failed to remove archive {relative}: {error}")
        }
        PurgeEvent::RemoteReconciled { deleted, kept } => {
            format!("Remote store reconciled: {deleted} deleted, {kept} kept")
        }
        PurgeEvent::RemoteReconcileFailed { message } => {
            format!("Remote archives were not deleted: '{message}'")
        }
        PurgeEvent::DirectoryRemoved { path } => {
            format!("Removed empty directory: {}", path.display())
        }
        PurgeEvent::DirectoryRemovalFailed { path, error } => {
            format!("Failed to remove directory {}: {error}", path.display())
        }
        PurgeEvent::DirectoryUnreadable { path, error } => {
            format!("Could not list directory {}: {error}", path.display())
        }
    }
}

pub fn print_summary(format: &OutputFormat, summary: &PurgeSummary) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if summary.outcome != PurgeOutcome::NoArchives {
                println!("Done.");
            }
        }
        other => print_document(other, summary)?,
    }
    Ok(())
}

pub fn print_document<T: Serialize>(format: &OutputFormat, value: &T) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
