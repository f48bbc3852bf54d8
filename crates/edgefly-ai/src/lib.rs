//! Language-understanding collaborator for the EdgeFly agent.
//!
//! Provides the `LanguageUnderstanding` trait the pipeline classifies turns
//! through, a Gemini-backed implementation, and the defensive parsing that
//! turns a free-text model reply into a structured intent draft: locate the
//! first top-level JSON object, parse it leniently, and treat any failure as
//! "no structured result" rather than an error.

pub mod gemini;
pub mod intent;
pub mod prompt;

use async_trait::async_trait;

use edgefly_common::UserContext;

pub use gemini::{GeminiClient, GeminiConfig};
pub use intent::{extract_first_json, DraftIntent};

/// Classifies one user turn, given the remembered context from the prior
/// turn. Returns the model's raw textual reply; structured-intent extraction
/// happens in [`intent`].
#[async_trait]
pub trait LanguageUnderstanding: Send + Sync {
    async fn classify(
        &self,
        message: &str,
        context: Option<&UserContext>,
    ) -> Result<String, AiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
