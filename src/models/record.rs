//! Result of one pipeline run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{AuthenticityLabel, NatureLabel};
use crate::extraction::DocumentFormat;

/// Everything a single run produced, in the shape the export layer expects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub run_id: Uuid,
    pub document_name: String,
    pub format: DocumentFormat,
    pub analyzed_at: DateTime<Utc>,

    /// Text pulled out of the upload by the format adapter
    pub extracted_text: String,
    /// Text returned by the generation service for the user's query
    pub generated_text: String,

    pub nature: NatureLabel,
    pub authenticity: AuthenticityLabel,
}

impl AnalysisRecord {
    pub fn new(
        document_name: impl Into<String>,
        format: DocumentFormat,
        extracted_text: String,
        generated_text: String,
        nature: NatureLabel,
        authenticity: AuthenticityLabel,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            document_name: document_name.into(),
            format,
            analyzed_at: Utc::now(),
            extracted_text,
            generated_text,
            nature,
            authenticity,
        }
    }

    /// First `max_chars` characters of the extracted text
    pub fn extracted_preview(&self, max_chars: usize) -> &str {
        match self.extracted_text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.extracted_text[..idx],
            None => &self.extracted_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(extracted: &str) -> AnalysisRecord {
        AnalysisRecord::new(
            "notes.docx",
            DocumentFormat::Docx,
            extracted.to_string(),
            "generated".to_string(),
            NatureLabel::General,
            AuthenticityLabel::Unclear,
        )
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let rec = record("héllo wörld");
        assert_eq!(rec.extracted_preview(4), "héll");
        assert_eq!(rec.extracted_preview(100), "héllo wörld");
        assert_eq!(rec.extracted_preview(0), "");
    }

    #[test]
    fn test_serializes_labels_as_snake_case() {
        let json = serde_json::to_value(record("x")).unwrap();
        assert_eq!(json["nature"], "general");
        assert_eq!(json["authenticity"], "unclear");
        assert_eq!(json["format"], "docx");
        assert_eq!(json["documentName"], "notes.docx");
    }
}
