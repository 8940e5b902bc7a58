use std::path::{Path, PathBuf};

use super::output::OutputFormat;

pub struct CliContext {
    output: OutputFormat,
    metrics_file: Option<PathBuf>,
}

impl CliContext {
    pub fn new(output: OutputFormat, metrics_file: Option<PathBuf>) -> Self {
        Self {
            output,
            metrics_file,
        }
    }

    pub fn output(&self) -> &OutputFormat {
        &self.output
    }

    pub fn metrics_file(&self) -> Option<&Path> {
        self.metrics_file.as_deref()
    }
}
