// ABOUTME: Chooses the output format from the destination path and serializes records for it.
// ABOUTME: Unknown extensions get ".json" appended; no destination means JSON on stdout.

use std::path::{Path, PathBuf};

use anyhow::Result;
use sift::{to_csv, to_json, OutputFormat, Record};

/// Where records go and in which format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Destination {
    pub fn resolve(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self {
                path: None,
                format: OutputFormat::Json,
            };
        };

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(OutputFormat::from_extension)
        {
            Some(format) => Self {
                path: Some(path.to_path_buf()),
                format,
            },
            None => {
                let mut name = path.as_os_str().to_owned();
                name.push(".json");
                Self {
                    path: Some(PathBuf::from(name)),
                    format: OutputFormat::Json,
                }
            }
        }
    }

    pub fn render(&self, records: &[Record], compact: bool) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Json => to_json(records, !compact)?,
            OutputFormat::Csv => to_csv(records)?,
        })
    }
}
