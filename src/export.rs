//! Record export
//!
//! CSV keeps the fixed four-column layout of the original download. JSON
//! carries the whole record, including run metadata.

use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AnalysisRecord;

pub const CSV_HEADER: [&str; 4] = [
    "Extracted details",
    "Generated Details",
    "Detected Nature",
    "Authenticity",
];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a header row followed by one row per record
pub fn write_csv<W: Write>(records: &[AnalysisRecord], mut writer: W) -> Result<(), ExportError> {
    write_row(&mut writer, &CSV_HEADER)?;

    for record in records {
        write_row(
            &mut writer,
            &[
                record.extracted_text.as_str(),
                record.generated_text.as_str(),
                record.nature.display_name(),
                record.authenticity.display_name(),
            ],
        )?;
    }

    writer.flush()?;
    Ok(())
}

pub fn to_csv(records: &[AnalysisRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn to_json(record: &AnalysisRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(record)?)
}

fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", line)
}

/// Quote a field when it holds a separator, quote, or line break.
/// Embedded quotes are doubled.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
