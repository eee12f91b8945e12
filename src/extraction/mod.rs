//! Document Text Extraction
//!
//! Pure Rust text extraction for uploaded documents, plus a vision path for
//! images.
//!
//! ## Supported Formats
//! - Image: described by the generation service (non-deterministic)
//! - PDF: per-page text via pdf-extract
//! - Spreadsheet: first sheet via calamine
//! - Word: .docx paragraphs via docx-rs
//!
//! ## Strategy
//! 1. Pick exactly one format from the declared type, then the file name
//! 2. Run that adapter only; a failure is final, there is no second attempt

mod dispatcher;
mod docx;
mod pdf;
mod spreadsheet;
mod vision;

pub use dispatcher::{ExtractedText, ExtractionDispatcher};
pub use docx::{extract_docx_text, DocxExtractor};
pub use pdf::{extract_pdf_text, PdfExtractor};
pub use spreadsheet::{extract_spreadsheet_text, render_sheet, SpreadsheetExtractor};
pub use vision::{prepare_image_for_vision, ImageExtractor, PreparedImage};


use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UploadedDocument;

/// Format families the pipeline can extract text from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Image,
    Pdf,
    Spreadsheet,
    Docx,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Spreadsheet => "spreadsheet",
            Self::Docx => "docx",
        }
    }

    /// Whether repeated extraction of the same bytes yields the same text
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Self::Image)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported file format: {declared_type:?} ({name})")]
    UnsupportedFormat { declared_type: String, name: String },

    #[error("{format} extraction failed: {reason}")]
    Failed {
        format: DocumentFormat,
        reason: String,
    },
}

impl ExtractionError {
    pub(crate) fn failed(format: DocumentFormat, reason: impl std::fmt::Display) -> Self {
        Self::Failed {
            format,
            reason: reason.to_string(),
        }
    }
}

/// A format adapter: turns the bytes of one upload into text.
///
/// Implementations read `document.bytes()` from the start and never keep
/// state between calls.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn format(&self) -> DocumentFormat;

    async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError>;
}

/// Run a CPU-bound parser on the blocking pool so the async workers stay free
pub(crate) async fn parse_blocking(
    format: DocumentFormat,
    document: &UploadedDocument,
    parse: fn(&[u8]) -> Result<String, ExtractionError>,
) -> Result<String, ExtractionError> {
    let document = document.clone();
    tokio::task::spawn_blocking(move || parse(document.bytes()))
        .await
        .map_err(|e| ExtractionError::failed(format, format!("Task failed: {}", e)))?
}

/// Map a declared type and file name to a format.
///
/// The declared type is checked first (`image`, `pdf`, `spreadsheet`, `word`),
/// then the `.xlsx` / `.docx` name suffix. A declared type that is empty or a
/// bare extension is first expanded to a MIME type via `mime_guess`.
pub fn select_format(declared_type: &str, name: &str) -> Option<DocumentFormat> {
    let declared = normalize_declared_type(declared_type, name);
    let name = name.to_lowercase();

    if declared.contains("image") {
        Some(DocumentFormat::Image)
    } else if declared.contains("pdf") {
        Some(DocumentFormat::Pdf)
    } else if declared.contains("spreadsheet") || name.ends_with(".xlsx") {
        Some(DocumentFormat::Spreadsheet)
    } else if declared.contains("word") || name.ends_with(".docx") {
        Some(DocumentFormat::Docx)
    } else {
        None
    }
}

/// The format a document would be routed to, or `UnsupportedFormat`
pub fn detect_format(document: &UploadedDocument) -> Result<DocumentFormat, ExtractionError> {
    select_format(document.declared_type(), document.name()).ok_or_else(|| {
        ExtractionError::UnsupportedFormat {
            declared_type: document.declared_type().to_string(),
            name: document.name().to_string(),
        }
    })
}

fn normalize_declared_type(declared_type: &str, name: &str) -> String {
    let declared = declared_type.trim().to_lowercase();
    if declared.contains('/') {
        return declared;
    }

    let ext = declared.trim_start_matches('.');
    let guessed = if ext.is_empty() {
        mime_guess::from_path(name).first()
    } else {
        mime_guess::from_ext(ext).first()
    };

    guessed
        .map(|m| m.essence_str().to_lowercase())
        .unwrap_or(declared)
}
