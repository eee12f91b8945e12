//! Runtime configuration
//!
//! Defaults, overridden by `DOCSENSE_*` environment variables, overridden in
//! turn by command line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the generation step is given
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    /// The text produced by the extractor
    #[default]
    ExtractedText,
    /// The raw upload, for images
    Document,
}

impl GenerationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractedText => "extracted_text",
            Self::Document => "document",
        }
    }
}

impl FromStr for GenerationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "extracted_text" | "text" => Ok(Self::ExtractedText),
            "document" => Ok(Self::Document),
            other => Err(format!("expected extracted_text or document, got {:?}", other)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gemini model name (default: gemini-1.5-flash)
    pub model: String,

    /// Base URL for the Generative Language API
    pub base_url: String,

    /// HTTP timeout for a single generation call
    pub timeout_secs: u64,

    pub temperature: f32,
    pub max_output_tokens: u32,

    /// Characters of extracted text shown in the CLI report
    pub preview_chars: usize,

    pub generation_source: GenerationSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 120,
            temperature: 0.4,
            max_output_tokens: 2048,
            preview_chars: 2000,
            generation_source: GenerationSource::ExtractedText,
        }
    }
}

impl AppConfig {
    /// Defaults with `DOCSENSE_*` overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary variable lookup.
    /// Unset and blank variables leave the default in place.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = get("DOCSENSE_MODEL") {
            config.model = model.trim().to_string();
        }
        if let Some(base_url) = get("DOCSENSE_BASE_URL") {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(v) = get("DOCSENSE_TIMEOUT_SECS") {
            config.timeout_secs = parse("DOCSENSE_TIMEOUT_SECS", &v)?;
            if config.timeout_secs == 0 {
                return Err(invalid("DOCSENSE_TIMEOUT_SECS", &v, "must be greater than zero"));
            }
        }
        if let Some(v) = get("DOCSENSE_TEMPERATURE") {
            config.temperature = parse("DOCSENSE_TEMPERATURE", &v)?;
            if !(0.0..=2.0).contains(&config.temperature) {
                return Err(invalid("DOCSENSE_TEMPERATURE", &v, "must be between 0 and 2"));
            }
        }
        if let Some(v) = get("DOCSENSE_MAX_OUTPUT_TOKENS") {
            config.max_output_tokens = parse("DOCSENSE_MAX_OUTPUT_TOKENS", &v)?;
        }
        if let Some(v) = get("DOCSENSE_PREVIEW_CHARS") {
            config.preview_chars = parse("DOCSENSE_PREVIEW_CHARS", &v)?;
        }
        if let Some(v) = get("DOCSENSE_GENERATION_SOURCE") {
            config.generation_source = parse("DOCSENSE_GENERATION_SOURCE", &v)?;
        }

        Ok(config)
    }
}

/// Load `.env` from the working directory, then from the user config
/// directory (`~/.config/docsense/.env` on Linux). Earlier files win.
///
/// Missing files are skipped. Files that exist but cannot be read or parsed
/// are returned so the caller can report them once logging is up.
pub fn load_env_files() -> Vec<(PathBuf, dotenvy::Error)> {
    let mut failures = Vec::new();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => failures.push((PathBuf::from(".env"), e)),
    }

    if let Some(path) = dirs::config_dir().map(|dir| dir.join("docsense").join(".env")) {
        if let Err(e) = load_env_file(&path) {
            failures.push((path, e));
        }
    }

    failures
}

/// Load one env file. Returns `Ok(false)` when the file does not exist.
fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    if !path.exists() {
        return Ok(false);
    }
    dotenvy::from_path(path)?;
    Ok(true)
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, value, e))
}

fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
