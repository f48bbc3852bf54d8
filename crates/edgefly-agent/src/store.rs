//! Per-user conversational memory with time-based expiry.
//!
//! Context is advisory, not authoritative: concurrent writes for the same
//! user are last-write-wins, and a lost update only costs a follow-up
//! question. Entries expire lazily at read time; there is no background
//! sweep.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use edgefly_common::{TravelClass, TripDates, UserContext};

/// How long remembered context stays usable.
pub const CONTEXT_TTL: Duration = Duration::from_secs(3 * 60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("context store unavailable: {0}")]
    Unavailable(String),
}

/// Fields to merge into a user's remembered context. `None` leaves the
/// existing value in place.
#[derive(Debug, Clone, Default)]
pub struct ContextUpdate {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub travel_class: Option<TravelClass>,
    pub passengers: Option<u8>,
    pub dates: TripDates,
}

/// Injected context-store abstraction. The in-memory implementation below
/// is the default; the pipeline treats any failure as "no memory" and
/// carries on.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Remembered context, or `None` when absent or expired.
    async fn get(&self, user_id: &str) -> Result<Option<UserContext>, StoreError>;
    /// Merge `update` into the user's context and stamp the current time.
    async fn set(&self, user_id: &str, update: ContextUpdate) -> Result<(), StoreError>;
    async fn clear(&self, user_id: &str) -> Result<(), StoreError>;
}

/// In-memory keyed store behind an async RwLock.
pub struct MemoryStore {
    ttl: chrono::Duration,
    entries: RwLock<HashMap<String, UserContext>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_ttl(CONTEXT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(3)),
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn get_at(&self, user_id: &str, now: DateTime<Utc>) -> Option<UserContext> {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(user_id) {
                None => return None,
                Some(entry) => now.signed_duration_since(entry.timestamp) > self.ttl,
            }
        };

        if expired {
            // Re-check under the write lock; a concurrent set may have
            // refreshed the entry since the read above.
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get(user_id) {
                if now.signed_duration_since(entry.timestamp) > self.ttl {
                    debug!(user = user_id, "evicting expired context");
                    entries.remove(user_id);
                    return None;
                }
                return Some(entry.clone());
            }
            return None;
        }

        self.entries.read().await.get(user_id).cloned()
    }

    async fn set_at(&self, user_id: &str, update: ContextUpdate, now: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(user_id.to_string())
            .or_insert_with(|| UserContext::new(now));

        if update.origin.is_some() {
            entry.last_origin = update.origin;
        }
        if update.destination.is_some() {
            entry.last_destination = update.destination;
        }
        if update.travel_class.is_some() {
            entry.last_travel_class = update.travel_class;
        }
        if update.passengers.is_some() {
            entry.last_passengers = update.passengers;
        }
        if update.dates.departure.is_some() {
            entry.last_dates.departure = update.dates.departure;
        }
        if update.dates.return_date.is_some() {
            entry.last_dates.return_date = update.dates.return_date;
        }
        entry.timestamp = now;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserContext>, StoreError> {
        Ok(self.get_at(user_id, Utc::now()).await)
    }

    async fn set(&self, user_id: &str, update: ContextUpdate) -> Result<(), StoreError> {
        self.set_at(user_id, update, Utc::now()).await;
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(user_id);
        Ok(())
    }
}
