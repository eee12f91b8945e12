pub mod ai;
pub mod classify;
mod commands;
pub mod config;
pub mod export;
pub mod extraction;
pub mod models;
pub mod pipeline;

pub use ai::{ContentPart, GenerationError, TextGenerator};
pub use classify::{classify_authenticity, classify_nature, AuthenticityLabel, NatureLabel};
pub use extraction::{detect_format, DocumentFormat, ExtractionDispatcher, ExtractionError};
pub use models::{AnalysisRecord, UploadedDocument};
pub use pipeline::{DocumentAnalyzer, FailureKind, PipelineError};

use std::process::ExitCode;

use clap::Parser;
use commands::{exit_code_for, Cli};
use tracing_subscriber::EnvFilter;

pub fn run() -> ExitCode {
    // .env in the working directory, then the user config directory
    let env_failures = config::load_env_files();

    // Default: warn for dependencies, info for pipeline steps.
    // Use RUST_LOG=debug for request-level logs. Stdout is kept for output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,docsense_lib=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    for (path, e) in &env_failures {
        tracing::warn!(path = %path.display(), error = %e, "Failed to load env file");
    }

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli.execute()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    }
}
