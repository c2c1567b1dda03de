use anyhow::Context;
use clap::ValueEnum;
use std::io::Write;

use crate::types::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Json,
    /// One YAML document per record
    Yaml,
}

/// Destination for snapshot records.
pub struct Sink {
    format: OutputFormat,
    writer: Box<dyn Write + Send>,
}

impl Sink {
    pub fn new(format: OutputFormat, writer: Box<dyn Write + Send>) -> Self {
        Self { format, writer }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, Box::new(std::io::stdout()))
    }

    pub fn emit(&mut self, entries: &[LogEntry]) -> anyhow::Result<()> {
        for entry in entries {
            match self.format {
                OutputFormat::Json => {
                    serde_json::to_writer(&mut self.writer, entry).with_context(|| {
                        format!("Failed to encode {} {}", entry.resource_type, entry.name)
                    })?;
                    self.writer.write_all(b"\n")?;
                }
                OutputFormat::Yaml => {
                    let doc = serde_yaml::to_string(entry).with_context(|| {
                        format!("Failed to encode {} {}", entry.resource_type, entry.name)
                    })?;
                    self.writer.write_all(b"---\n")?;
                    self.writer.write_all(doc.as_bytes())?;
                }
            }
        }
        self.writer.flush().context("Failed to flush output")?;
        Ok(())
    }
}
