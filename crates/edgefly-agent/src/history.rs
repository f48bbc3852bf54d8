//! Search-history persistence, fire-and-forget.

use async_trait::async_trait;

use edgefly_common::FlightQuery;

#[derive(Debug, thiserror::Error)]
#[error("history persistence failed: {0}")]
pub struct HistoryError(pub String);

/// Records resolved searches for a user. The pipeline never waits on this
/// or surfaces its failures; they are logged and dropped.
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn record(&self, user_id: &str, query: &FlightQuery) -> Result<(), HistoryError>;
}

/// Sink that drops everything, for guests and tests.
pub struct NullHistory;

#[async_trait]
impl HistorySink for NullHistory {
    async fn record(&self, _user_id: &str, _query: &FlightQuery) -> Result<(), HistoryError> {
        Ok(())
    }
}
