//! Flight-search collaborators for the EdgeFly agent.
//!
//! Provides the `FlightProvider` and `Autocomplete` traits the pipeline
//! consumes, a reqwest-backed Amadeus client implementing both, the
//! canonical-offer mapping applied once at this boundary, and a reusable
//! retry policy with exponential backoff for transient provider failures.

pub mod amadeus;
pub mod retry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use edgefly_common::{CanonicalFlightOffer, FlightQuery};

pub use amadeus::{AmadeusClient, AmadeusConfig, Environment};
pub use retry::RetryPolicy;

/// Live flight-offer search against the upstream provider.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search(&self, query: &FlightQuery) -> Result<Vec<CanonicalFlightOffer>, SearchError>;
}

/// Airport/city keyword lookup. An empty suggestion list is a valid,
/// non-error outcome.
#[async_trait]
pub trait Autocomplete: Send + Sync {
    async fn lookup(&self, keyword: &str) -> Result<Vec<LocationSuggestion>, SearchError>;
}

/// One autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// 4xx-class rejection: bad parameters or nothing found. Never retried.
    #[error("provider rejected the request (HTTP {status}): {detail}")]
    InvalidRequest { status: u16, detail: String },
    /// 5xx/429-class failure. Retried per policy.
    #[error("provider temporarily unavailable (HTTP {status}): {detail}")]
    Unavailable { status: u16, detail: String },
    #[error("provider authentication failed: {0}")]
    Auth(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl SearchError {
    /// Whether the retry policy should try again after this failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Network(_))
    }

    /// Classify a non-success provider status.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if status == 429 || status >= 500 {
            Self::Unavailable { status, detail }
        } else {
            Self::InvalidRequest { status, detail }
        }
    }
}
