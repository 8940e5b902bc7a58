use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::CliContext;
use crate::cli::output::{print_document, OutputFormat};
use crate::config::{load_repository_config, LoadedConfig, DEFAULT_CONFIG_FILE};

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Print the parts of the configuration the purge uses
    Show {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        file: PathBuf,
    },
    /// Check that a purge could start with this configuration
    Validate {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        file: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    file: PathBuf,
    archive_directory: String,
    output_dir: PathBuf,
    nexus: Option<String>,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    match args.action {
        ConfigAction::Show { file } => {
            let loaded = load_repository_config(&file).await?;
            let format = match ctx.output() {
                OutputFormat::Human => &OutputFormat::Yaml,
                other => other,
            };
            print_document(format, &loaded.config)
        }
        ConfigAction::Validate { file } => {
            let loaded = load_repository_config(&file).await?;
            let report = validate(&loaded)?;
            match ctx.output() {
                OutputFormat::Human => {
                    println!("Configuration {} is valid.", report.file.display());
                    let archives = report.output_dir.join(&report.archive_directory);
                    println!("  archives: {}", archives.display());
                    if let Some(nexus) = &report.nexus {
                        println!("  remote store: {nexus}");
                    }
                    Ok(())
                }
                other => print_document(other, &report),
            }
        }
    }
}

fn validate(loaded: &LoadedConfig) -> Result<ValidationReport> {
    let prefix = loaded.archive_prefix()?;
    let output_dir = loaded.resolve_output_dir(None)?;
    let nexus = loaded
        .nexus_config()?
        .map(|config| format!("{} ({})", config.base_url, config.repository));
    Ok(ValidationReport {
        file: loaded.path.clone(),
        archive_directory: prefix.as_str().to_string(),
        output_dir,
        nexus,
    })
}
