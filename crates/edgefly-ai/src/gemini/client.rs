//! Gemini request building and reply parsing for the classifier.

use crate::AiError;

use super::config::GeminiConfig;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini-backed classifier client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model)
    }

    /// Build the JSON request body for a single-prompt generateContent call.
    pub(crate) fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        })
    }

    /// Pull the reply text out of a generateContent response.
    pub(crate) fn parse_reply(&self, json: serde_json::Value) -> Result<String, AiError> {
        let parts = json["candidates"]
            .as_array()
            .and_then(|c| c.first())
            .map(|first| first["content"]["parts"].clone())
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        let mut content = String::new();
        for part in parts.as_array().cloned().unwrap_or_default() {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(AiError::ApiError("empty model reply".to_string()));
        }
        Ok(content)
    }
}
