//! Command line surface
//!
//! `analyze` runs the pipeline over one file. `key` manages the stored
//! Gemini API key. Handlers stay thin and delegate to the library.

mod analyze;
mod key;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use analyze::AnalyzeArgs;
pub use key::KeyCommands;

use crate::pipeline::{FailureKind, PipelineError};

#[derive(Parser, Debug)]
#[command(
    name = "docsense",
    version,
    about = "Extract text from a document, generate content for a query, and classify the result"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a PDF, image, .xlsx, or .docx file
    Analyze(AnalyzeArgs),

    /// Manage the Gemini API key in the OS keychain
    Key {
        #[command(subcommand)]
        action: KeyCommands,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => analyze::run(args).await,
            Commands::Key { action } => key::run(action),
        }
    }
}

/// Process exit code for a failed command
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PipelineError>().map(PipelineError::kind) {
        Some(FailureKind::UnsupportedFormat) => 2,
        Some(FailureKind::ExtractionFailure) => 3,
        Some(FailureKind::GenerationFailure) => 4,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GenerationError;
    use crate::config::GenerationSource;
    use crate::export::ExportFormat;
    use crate::extraction::{DocumentFormat, ExtractionError};

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from([
            "docsense",
            "analyze",
            "invoice.pdf",
            "--query",
            "Summarize this",
            "--format",
            "json",
            "--source",
            "document",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.file.to_str(), Some("invoice.pdf"));
                assert_eq!(args.query, "Summarize this");
                assert_eq!(args.format, ExportFormat::Json);
                assert_eq!(args.source, Some(GenerationSource::Document));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_query_is_required() {
        assert!(Cli::try_parse_from(["docsense", "analyze", "invoice.pdf"]).is_err());
    }

    #[test]
    fn test_parse_key_commands() {
        let cli = Cli::try_parse_from(["docsense", "key", "status"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Key {
                action: KeyCommands::Status
            }
        ));
    }

    #[test]
    fn test_exit_codes_follow_failure_kind() {
        let unsupported = anyhow::Error::new(PipelineError::from(
            ExtractionError::UnsupportedFormat {
                declared_type: "audio/mpeg".to_string(),
                name: "song.mp3".to_string(),
            },
        ));
        assert_eq!(exit_status(&unsupported), 2);

        let failed = anyhow::Error::new(PipelineError::from(ExtractionError::Failed {
            format: DocumentFormat::Pdf,
            reason: "bad xref".to_string(),
        }));
        assert_eq!(exit_status(&failed), 3);

        let generation = anyhow::Error::new(PipelineError::from(GenerationError::EmptyResponse));
        assert_eq!(exit_status(&generation), 4);

        let wrapped = anyhow::Error::new(PipelineError::from(GenerationError::EmptyResponse))
            .context("Failed to analyze notes.docx");
        assert_eq!(exit_status(&wrapped), 4);

        let other = anyhow::anyhow!("no key");
        assert_eq!(exit_status(&other), 1);
    }
}
