//! Generation Orchestrator
//!
//! Combines the user's query with document content and hands the request to
//! the text generator. Part order is `[query, content]` and is significant.

use std::sync::Arc;

use super::{ContentPart, GenerationError, TextGenerator};
use crate::models::UploadedDocument;

pub struct GenerationOrchestrator {
    generator: Arc<dyn TextGenerator>,
}

impl GenerationOrchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate from extracted text: parts are `[query, extracted_text]`
    pub async fn generate(
        &self,
        extracted_text: &str,
        query: &str,
    ) -> Result<String, GenerationError> {
        let parts = [ContentPart::text(query), ContentPart::text(extracted_text)];
        self.run(&parts).await
    }

    /// Generate from the raw upload: parts are `[query, document bytes]`.
    /// Lets the model see an image itself rather than a description of it.
    pub async fn generate_from_document(
        &self,
        document: &UploadedDocument,
        query: &str,
    ) -> Result<String, GenerationError> {
        let parts = [
            ContentPart::text(query),
            ContentPart::InlineData {
                mime_type: document.mime_type(),
                data: document.bytes().to_vec(),
            },
        ];
        self.run(&parts).await
    }

    async fn run(&self, parts: &[ContentPart]) -> Result<String, GenerationError> {
        let reply = self.generator.generate(parts).await?;

        if reply.trim().is_empty() {
            tracing::warn!("Generator returned an empty reply");
            return Err(GenerationError::EmptyResponse);
        }

        tracing::info!(chars = reply.len(), "Generated content");
        Ok(reply)
    }
}
