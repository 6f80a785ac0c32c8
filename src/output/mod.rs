use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Alert;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to serialize alerts: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write alert output {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Json,
    Console,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "console" => OutputFormat::Console,
            _ => OutputFormat::Json,
        }
    }
}

/// Writes the finished alert collection.
///
/// The whole document is serialized in memory before the file is
/// touched, so a failed run never leaves a partial artifact behind.
pub struct AlertWriter {
    format: OutputFormat,
    path: PathBuf,
}

impl AlertWriter {
    pub fn new(format: OutputFormat, path: PathBuf) -> Self {
        AlertWriter { format, path }
    }

    pub fn write_alerts(&self, alerts: &[Alert]) -> Result<(), OutputError> {
        let document = serde_json::to_string_pretty(alerts)?;

        match self.format {
            OutputFormat::Json => {
                fs::write(&self.path, document).map_err(|source| OutputError::Write {
                    path: self.path.display().to_string(),
                    source,
                })?;
                log::info!("Wrote {} alert(s) to {}", alerts.len(), self.path.display());
            }
            OutputFormat::Console => {
                println!("{}", document);
            }
        }

        Ok(())
    }
}
