use async_trait::async_trait;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

use super::{parse_blocking, DocumentFormat, ExtractionError, TextExtractor};
use crate::models::UploadedDocument;

/// Extracts paragraph text from .docx files using docx-rs
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

#[async_trait]
impl TextExtractor for DocxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        parse_blocking(DocumentFormat::Docx, document, extract_docx_text).await
    }
}

/// Body paragraphs in document order, one per line.
///
/// Tables, drawings and other non-paragraph body elements are skipped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = docx_rs::read_docx(bytes)
        .map_err(|e| ExtractionError::failed(DocumentFormat::Docx, e))?;

    let paragraphs: Vec<String> = doc
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    let text = paragraphs.join("\n");

    tracing::info!(
        paragraphs = paragraphs.len(),
        chars = text.len(),
        "DOCX extracted"
    );

    Ok(text)
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut output = String::new();
    for child in &para.children {
        push_paragraph_child(child, &mut output);
    }
    output
}

fn push_paragraph_child(child: &ParagraphChild, output: &mut String) {
    match child {
        ParagraphChild::Run(run) => push_run(run, output),
        ParagraphChild::Hyperlink(link) => {
            for inner in &link.children {
                push_paragraph_child(inner, output);
            }
        }
        _ => {}
    }
}

fn push_run(run: &Run, output: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(text) => output.push_str(&text.text),
            RunChild::Tab(_) => output.push('\t'),
            RunChild::Break(_) => output.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rs::{Docx, Table, TableCell, TableRow};
    use std::io::Cursor;

    fn text_paragraph(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    /// Pack an in-memory .docx from paragraphs, with a table after the first one
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for (i, text) in paragraphs.iter().enumerate() {
            docx = docx.add_paragraph(text_paragraph(text));
            if i == 0 {
                let table = Table::new(vec![TableRow::new(vec![
                    TableCell::new().add_paragraph(text_paragraph("cell text")),
                ])]);
                docx = docx.add_table(table);
            }
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_paragraphs_one_per_line() {
        let bytes = build_docx(&["Curriculum Vitae", "Jane Doe", "Skills: Rust"]);
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Curriculum Vitae\nJane Doe\nSkills: Rust");
    }

    #[test]
    fn test_tables_are_skipped() {
        let bytes = build_docx(&["Before", "After"]);
        let text = extract_docx_text(&bytes).unwrap();
        assert!(!text.contains("cell text"));
        assert_eq!(text, "Before\nAfter");
    }

    #[test]
    fn test_empty_paragraph_kept_as_blank_line() {
        let bytes = build_docx(&["Top", "", "Bottom"]);
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Top\n\nBottom");
    }

    #[test]
    fn test_run_tabs_and_breaks() {
        let para = Paragraph::new().add_run(
            Run::new()
                .add_text("Total")
                .add_tab()
                .add_text("42")
                .add_break(docx_rs::BreakType::TextWrapping)
                .add_text("due"),
        );
        assert_eq!(paragraph_text(&para), "Total\t42\ndue");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let bytes = build_docx(&["Same", "bytes"]);
        assert_eq!(
            extract_docx_text(&bytes).unwrap(),
            extract_docx_text(&bytes).unwrap()
        );
    }

    #[test]
    fn test_corrupt_docx_fails() {
        let err = extract_docx_text(b"not a zip archive").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Failed {
                format: DocumentFormat::Docx,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_adapter_matches_direct_extraction() {
        let bytes = build_docx(&["First", "Second"]);
        let doc = UploadedDocument::new(bytes.clone(), "", "notes.docx");

        let via_adapter = DocxExtractor.extract(&doc).await.unwrap();
        assert_eq!(via_adapter, extract_docx_text(&bytes).unwrap());
    }
}
