//! Gemini API Client
//!
//! Handles communication with Google's Generative Language API:
//! - Text and inline image parts in a single user turn
//! - Error envelopes mapped onto `GenerationError`
//! - Token usage logging
//!
//! No retries: a failed call is reported once and the caller decides.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;

use super::types::*;
use crate::ai::{ContentPart, GenerationError, TextGenerator};
use crate::config::AppConfig;

/// Gemini client bound to one model
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(config: &AppConfig, api_key: String) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(&self, parts: &[ContentPart]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: parts.iter().map(to_wire_part).collect(),
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, parts: &[ContentPart]) -> Result<String, GenerationError> {
        let request = self.build_request(parts);

        tracing::debug!(
            model = %self.model,
            parts = parts.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = parse_error_body(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Gemini request failed");
            return Err(err);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &body.usage_metadata {
            tracing::info!(
                model = %self.model,
                prompt_tokens = usage.prompt_token_count.unwrap_or(0),
                output_tokens = usage.candidates_token_count.unwrap_or(0),
                total_tokens = usage.total_token_count.unwrap_or(0),
                "Gemini usage"
            );
        }

        parse_response(body)
    }
}

fn to_wire_part(part: &ContentPart) -> Part {
    match part {
        ContentPart::Text(text) => Part {
            text: Some(text.clone()),
            inline_data: None,
        },
        ContentPart::InlineData { mime_type, data } => Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(data),
            }),
        },
    }
}

/// Concatenate the text parts of the first candidate
fn parse_response(body: GenerateContentResponse) -> Result<String, GenerationError> {
    let Some(candidate) = body.candidates.into_iter().next() else {
        return match body.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(GenerationError::Blocked(reason)),
            None => Err(GenerationError::EmptyResponse),
        };
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        return match reason.as_str() {
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                Err(GenerationError::Blocked(reason.clone()))
            }
            _ => Err(GenerationError::EmptyResponse),
        };
    }

    Ok(text)
}

fn parse_error_body(status: u16, body: &str) -> GenerationError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => match envelope.error.status {
            Some(code) => format!("{}: {}", code, envelope.error.message),
            None => envelope.error.message,
        },
        _ => body.trim().to_string(),
    };

    GenerationError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> GeminiClient {
        GeminiClient::new(&AppConfig::default(), "test-key".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_uses_model() {
        let mut config = AppConfig::default();
        config.base_url = "http://localhost:8080/".to_string();
        config.model = "gemini-test".to_string();
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_preserves_part_order() {
        let request = client().build_request(&[
            ContentPart::text("query first"),
            ContentPart::InlineData {
                mime_type: "image/png".to_string(),
                data: b"abc".to_vec(),
            },
            ContentPart::text("then text"),
        ]);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0], json!({"text": "query first"}));
        assert_eq!(
            parts[1],
            json!({"inline_data": {"mime_type": "image/png", "data": "YWJj"}})
        );
        assert_eq!(parts[2], json!({"text": "then text"}));
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "world"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2, "totalTokenCount": 7}
        }))
        .unwrap();

        assert_eq!(parse_response(body).unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        assert!(matches!(
            parse_response(body),
            Err(GenerationError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_parse_response_empty_candidate() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert!(matches!(parse_response(body), Err(GenerationError::EmptyResponse)));

        let body: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(parse_response(body), Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn test_parse_response_safety_finish() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(matches!(parse_response(body), Err(GenerationError::Blocked(_))));
    }

    #[test]
    fn test_parse_error_envelope() {
        let body = r#"{"error": {"code": 400, "message": "Unsupported MIME type: audio/mpeg", "status": "INVALID_ARGUMENT"}}"#;
        match parse_error_body(400, body) {
            GenerationError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "INVALID_ARGUMENT: Unsupported MIME type: audio/mpeg");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_plain_body() {
        match parse_error_body(502, "  Bad Gateway \n") {
            GenerationError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let mut config = AppConfig::default();
        config.base_url = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 2;
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();

        let err = client.generate(&[ContentPart::text("hi")]).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }
}
