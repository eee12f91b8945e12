//! Test doubles for the generation seam

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ContentPart, GenerationError, TextGenerator};

enum Reply {
    Text(String),
    Fail,
}

/// Generator stub that records every request and answers with a fixed reply
pub(crate) struct RecordingGenerator {
    reply: Reply,
    calls: Mutex<Vec<Vec<ContentPart>>>,
}

impl RecordingGenerator {
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Reply::Text(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: Reply::Fail,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<ContentPart>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, parts: &[ContentPart]) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(parts.to_vec());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(GenerationError::Api {
                status: 429,
                message: "Resource has been exhausted (e.g. check quota).".to_string(),
            }),
        }
    }
}
