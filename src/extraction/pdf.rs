use async_trait::async_trait;

use super::{parse_blocking, DocumentFormat, ExtractionError, TextExtractor};
use crate::models::UploadedDocument;

/// Extracts text from PDFs page by page using pdf-extract
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        parse_blocking(DocumentFormat::Pdf, document, extract_pdf_text).await
    }
}

/// Extract the text of every page in document order.
///
/// Pages are trimmed and joined with a newline, in page order.
/// Wrapped in catch_unwind: pdf-extract (and its font parsers) can panic on
/// malformed input.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    tracing::debug!(size = bytes.len(), "Starting PDF extraction");

    let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "PDF extraction failed");
            return Err(ExtractionError::failed(DocumentFormat::Pdf, e));
        }
        Err(_panic) => {
            tracing::error!("PDF extraction panicked - likely malformed font/glyph");
            return Err(ExtractionError::failed(
                DocumentFormat::Pdf,
                "parser panicked - likely contains malformed fonts",
            ));
        }
    };

    let text = join_pages(&pages);

    tracing::info!(pages = pages.len(), chars = text.len(), "PDF extracted");

    Ok(text)
}

/// One line group per page: each page is trimmed, then pages are joined by `\n`.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
