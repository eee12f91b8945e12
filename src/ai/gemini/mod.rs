//! Google Gemini backend for `TextGenerator`

mod client;
pub mod types;

pub use client::GeminiClient;
