//! Amadeus client struct, token management, and request plumbing.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::retry::RetryPolicy;
use crate::SearchError;

use super::config::AmadeusConfig;

/// Refresh the cached token this long before the provider expires it.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

pub(crate) struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Amadeus Self-Service API client.
pub struct AmadeusClient {
    pub(crate) config: AmadeusConfig,
    pub(crate) http: reqwest::Client,
    pub(crate) retry: RetryPolicy,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl AmadeusClient {
    pub fn new(config: AmadeusConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            retry: RetryPolicy::default(),
            token: RwLock::new(None),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Cached bearer token, refreshed via the client-credentials flow when
    /// absent or close to expiry.
    pub(crate) async fn access_token(&self) -> Result<String, SearchError> {
        if let Some(cached) = self.token.read().await.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        debug!(environment = ?self.config.environment, "requesting Amadeus access token");
        let response = self
            .http
            .post(format!("{}/v1/security/oauth2/token", self.config.base_url()))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            // A rejected credential is permanent; a sandbox outage is not.
            return Err(if status.is_server_error() {
                SearchError::from_status(status.as_u16(), detail)
            } else {
                SearchError::Auth(format!("HTTP {status}: {detail}"))
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let cached = CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now()
                + Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN),
        };
        *self.token.write().await = Some(cached);
        Ok(token.access_token)
    }

    /// Authenticated GET returning the parsed JSON body, with provider
    /// errors classified by status.
    pub(crate) async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, SearchError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}{}", self.config.base_url(), path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let detail = provider_detail(&body)
                .unwrap_or_else(|| format!("request failed with HTTP {status}"));
            return Err(SearchError::from_status(status.as_u16(), detail));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))
    }
}

/// First human-readable error detail in an Amadeus error body.
fn provider_detail(body: &serde_json::Value) -> Option<String> {
    body["errors"]
        .as_array()
        .and_then(|errors| errors.first())
        .and_then(|first| first["detail"].as_str().or_else(|| first["title"].as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_detail_prefers_detail_over_title() {
        let body = serde_json::json!({
            "errors": [{ "title": "INVALID DATE", "detail": "departureDate is in the past" }]
        });
        assert_eq!(
            provider_detail(&body).as_deref(),
            Some("departureDate is in the past")
        );

        let body = serde_json::json!({ "errors": [{ "title": "INVALID DATE" }] });
        assert_eq!(provider_detail(&body).as_deref(), Some("INVALID DATE"));

        assert_eq!(provider_detail(&serde_json::json!({})), None);
    }

    #[test]
    fn config_debug_redacts_secret() {
        let config = AmadeusConfig::new("key", "very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
