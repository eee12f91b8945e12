pub mod credentials;
pub mod gemini;
mod generator;
pub mod orchestrator;
#[cfg(test)]
pub(crate) mod testing;

pub use credentials::*;
pub use gemini::GeminiClient;
pub use generator::*;
pub use orchestrator::GenerationOrchestrator;
