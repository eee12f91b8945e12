use std::sync::Arc;

use super::{
    detect_format, DocumentFormat, DocxExtractor, ExtractionError, ImageExtractor, PdfExtractor,
    SpreadsheetExtractor, TextExtractor,
};
use crate::ai::TextGenerator;
use crate::models::UploadedDocument;

/// Text pulled from a document, tagged with the adapter that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub format: DocumentFormat,
    pub text: String,
}

/// Routes each upload to exactly one format adapter
pub struct ExtractionDispatcher {
    image: Box<dyn TextExtractor>,
    pdf: Box<dyn TextExtractor>,
    spreadsheet: Box<dyn TextExtractor>,
    docx: Box<dyn TextExtractor>,
}

impl ExtractionDispatcher {
    /// Standard adapters; images are described by `generator`
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_extractors(
            Box::new(ImageExtractor::new(generator)),
            Box::new(PdfExtractor),
            Box::new(SpreadsheetExtractor),
            Box::new(DocxExtractor),
        )
    }

    pub fn with_extractors(
        image: Box<dyn TextExtractor>,
        pdf: Box<dyn TextExtractor>,
        spreadsheet: Box<dyn TextExtractor>,
        docx: Box<dyn TextExtractor>,
    ) -> Self {
        debug_assert_eq!(image.format(), DocumentFormat::Image);
        debug_assert_eq!(pdf.format(), DocumentFormat::Pdf);
        debug_assert_eq!(spreadsheet.format(), DocumentFormat::Spreadsheet);
        debug_assert_eq!(docx.format(), DocumentFormat::Docx);

        Self {
            image,
            pdf,
            spreadsheet,
            docx,
        }
    }

    fn adapter(&self, format: DocumentFormat) -> &dyn TextExtractor {
        match format {
            DocumentFormat::Image => self.image.as_ref(),
            DocumentFormat::Pdf => self.pdf.as_ref(),
            DocumentFormat::Spreadsheet => self.spreadsheet.as_ref(),
            DocumentFormat::Docx => self.docx.as_ref(),
        }
    }

    /// Extract text from one document.
    ///
    /// Unsupported documents never reach an adapter. Adapter failures are
    /// returned as-is; no other adapter is tried.
    pub async fn extract(
        &self,
        document: &UploadedDocument,
    ) -> Result<ExtractedText, ExtractionError> {
        let format = detect_format(document).map_err(|e| {
            tracing::warn!(
                name = document.name(),
                declared_type = document.declared_type(),
                "No adapter for document"
            );
            e
        })?;

        tracing::info!(
            name = document.name(),
            format = %format,
            size = document.len(),
            "Extracting document"
        );

        let text = self.adapter(format).extract(document).await?;

        if text.is_empty() {
            tracing::warn!(
                name = document.name(),
                format = %format,
                "Document has no extractable text"
            );
        }

        Ok(ExtractedText { format, text })
    }
}
