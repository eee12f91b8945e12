//! Document Analysis Pipeline
//!
//! One run over one upload:
//! 1. Extract text with the adapter chosen for the document's format
//! 2. Generate content for the user's query
//! 3. Classify the generated content on both axes
//! 4. Assemble an `AnalysisRecord`
//!
//! Every failure is terminal for the run. Nothing is retried and no partial
//! record is produced.

use std::sync::Arc;

use thiserror::Error;

use crate::ai::{GenerationError, GenerationOrchestrator, TextGenerator};
use crate::classify::{classify_authenticity, classify_nature};
use crate::config::GenerationSource;
use crate::extraction::{DocumentFormat, ExtractionDispatcher, ExtractionError};
use crate::models::{AnalysisRecord, UploadedDocument};

/// Coarse failure category reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnsupportedFormat,
    ExtractionFailure,
    GenerationFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "unsupported_format",
            Self::ExtractionFailure => "extraction_failure",
            Self::GenerationFailure => "generation_failure",
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Content generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Extraction(ExtractionError::UnsupportedFormat { .. }) => {
                FailureKind::UnsupportedFormat
            }
            Self::Extraction(ExtractionError::Failed { .. }) => FailureKind::ExtractionFailure,
            Self::Generation(_) => FailureKind::GenerationFailure,
        }
    }
}

/// Runs extraction, generation, and classification for single uploads
pub struct DocumentAnalyzer {
    dispatcher: ExtractionDispatcher,
    orchestrator: GenerationOrchestrator,
    source: GenerationSource,
}

impl DocumentAnalyzer {
    /// Standard adapters, with `generator` serving both image description
    /// and content generation
    pub fn new(generator: Arc<dyn TextGenerator>, source: GenerationSource) -> Self {
        Self::from_parts(
            ExtractionDispatcher::new(generator.clone()),
            GenerationOrchestrator::new(generator),
            source,
        )
    }

    pub fn from_parts(
        dispatcher: ExtractionDispatcher,
        orchestrator: GenerationOrchestrator,
        source: GenerationSource,
    ) -> Self {
        Self {
            dispatcher,
            orchestrator,
            source,
        }
    }

    /// Analyze one document against the user's query.
    ///
    /// Labels are computed from the generated text, not the extracted text.
    pub async fn analyze(
        &self,
        document: &UploadedDocument,
        query: &str,
    ) -> Result<AnalysisRecord, PipelineError> {
        let extracted = self.dispatcher.extract(document).await?;

        tracing::info!(
            name = document.name(),
            format = %extracted.format,
            chars = extracted.text.chars().count(),
            "[Analyzer] Extraction complete"
        );

        let generated = match (self.source, extracted.format) {
            (GenerationSource::Document, DocumentFormat::Image) => {
                self.orchestrator
                    .generate_from_document(document, query)
                    .await?
            }
            _ => self.orchestrator.generate(&extracted.text, query).await?,
        };

        let nature = classify_nature(&generated);
        let authenticity = classify_authenticity(&generated);

        tracing::info!(
            name = document.name(),
            nature = nature.as_str(),
            authenticity = authenticity.as_str(),
            "[Analyzer] Classified generated content"
        );

        Ok(AnalysisRecord::new(
            document.name(),
            extracted.format,
            extracted.text,
            generated,
            nature,
            authenticity,
        ))
    }
}
