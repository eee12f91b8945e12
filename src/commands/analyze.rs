use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::ai::{CredentialManager, GeminiClient, GEMINI_PROVIDER};
use crate::config::{AppConfig, GenerationSource};
use crate::export::{self, ExportFormat};
use crate::extraction::{detect_format, DocumentFormat};
use crate::models::{AnalysisRecord, UploadedDocument};
use crate::pipeline::{DocumentAnalyzer, PipelineError};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Document to analyze
    pub file: PathBuf,

    /// What to generate from the document, e.g. "Write a blog post about this"
    #[arg(short, long)]
    pub query: String,

    /// Declared content type; guessed from the file extension when omitted
    #[arg(long = "type", value_name = "MIME")]
    pub declared_type: Option<String>,

    /// Gemini model, overriding DOCSENSE_MODEL
    #[arg(long)]
    pub model: Option<String>,

    /// Input for the generation step, overriding DOCSENSE_GENERATION_SOURCE
    #[arg(long, value_enum)]
    pub source: Option<GenerationSource>,

    /// Write the record to this file instead of printing a report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format used with --output
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
}

pub(super) async fn run(args: AnalyzeArgs) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(source) = args.source {
        config.generation_source = source;
    }

    let mut document = UploadedDocument::from_path(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    if let Some(declared_type) = args.declared_type {
        document = document.with_declared_type(declared_type);
    }

    // Unsupported uploads fail before any key lookup
    ensure_supported(&document)?;

    let api_key = CredentialManager::get_api_key(GEMINI_PROVIDER)?;
    let client = GeminiClient::new(&config, api_key)?;
    tracing::info!(
        model = client.model(),
        source = config.generation_source.as_str(),
        "Using Gemini"
    );

    let analyzer = DocumentAnalyzer::new(Arc::new(client), config.generation_source);
    let record = analyzer
        .analyze(&document, &args.query)
        .await
        .with_context(|| format!("Failed to analyze {}", document.name()))?;

    match args.output {
        Some(path) => {
            let contents = match args.format {
                ExportFormat::Csv => export::to_csv(std::slice::from_ref(&record))?,
                ExportFormat::Json => export::to_json(&record)?,
            };
            tokio::fs::write(&path, contents)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                format = args.format.as_str(),
                "Exported record"
            );
            println!("Saved {} export to {}", args.format.as_str(), path.display());
        }
        None => print_report(&record, config.preview_chars),
    }

    Ok(())
}

fn ensure_supported(document: &UploadedDocument) -> Result<DocumentFormat, PipelineError> {
    Ok(detect_format(document)?)
}

fn print_report(record: &AnalysisRecord, preview_chars: usize) {
    let preview = record.extracted_preview(preview_chars);
    let truncated = preview.len() < record.extracted_text.len();

    println!("Document: {} ({})", record.document_name, record.format);
    println!();
    println!("Extracted Text Preview:");
    println!("{}{}", preview, if truncated { "..." } else { "" });
    println!();
    println!("Generated Content:");
    println!("{}", record.generated_text);
    println!();
    println!("Detected Nature: {}", record.nature);
    println!("Authenticity: {}", record.authenticity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::exit_status;

    #[test]
    fn test_unsupported_upload_rejected_before_key_lookup() {
        let doc = UploadedDocument::new(vec![0u8; 8], "audio/mpeg", "song.mp3");
        let err = anyhow::Error::from(ensure_supported(&doc).unwrap_err());
        assert_eq!(exit_status(&err), 2);
    }

    #[test]
    fn test_supported_upload_passes() {
        let doc = UploadedDocument::new(Vec::<u8>::new(), "application/pdf", "bill.pdf");
        assert_eq!(ensure_supported(&doc).unwrap(), DocumentFormat::Pdf);
    }
}
