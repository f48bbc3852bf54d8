//! LanguageUnderstanding trait implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use edgefly_common::UserContext;

use crate::prompt::build_classifier_prompt;
use crate::{AiError, LanguageUnderstanding};

use super::client::GeminiClient;

#[async_trait]
impl LanguageUnderstanding for GeminiClient {
    async fn classify(
        &self,
        message: &str,
        context: Option<&UserContext>,
    ) -> Result<String, AiError> {
        let prompt = build_classifier_prompt(message, context);
        let body = self.build_request_body(&prompt);

        debug!(model = %self.config.model, "Gemini classify request");

        let response = self
            .http
            .post(self.api_url())
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_reply(json)
    }
}
