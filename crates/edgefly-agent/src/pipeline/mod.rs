//! Pipeline orchestrator: one operation, `handle_query`, consumed by the
//! transport layer.
//!
//! Every reachable branch returns a `SearchOutcome`; recoverable upstream
//! conditions degrade the message instead of propagating. The only
//! `success: false` outcome is caller-input validation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use edgefly_ai::LanguageUnderstanding;
use edgefly_common::{
    AssistantIntent, FlightQuery, ParsedIntent, ResolvedSearch, SearchOutcome, SearchPayload,
    TripDates,
};
use edgefly_search::{Autocomplete, FlightProvider, SearchError};

use crate::history::HistorySink;
use crate::normalize::QueryNormalizer;
use crate::resolver::LocationResolver;
use crate::store::{ContextStore, ContextUpdate};

#[cfg(test)]
mod tests;

/// The conversational flight-search agent.
///
/// Collaborators are injected; many `handle_query` invocations may run
/// concurrently over the same agent, with the context store the only state
/// shared between them.
pub struct Agent {
    normalizer: QueryNormalizer,
    resolver: LocationResolver,
    provider: Arc<dyn FlightProvider>,
    history: Arc<dyn HistorySink>,
    store: Arc<dyn ContextStore>,
}

impl Agent {
    pub fn new(
        understanding: Arc<dyn LanguageUnderstanding>,
        autocomplete: Arc<dyn Autocomplete>,
        provider: Arc<dyn FlightProvider>,
        history: Arc<dyn HistorySink>,
        store: Arc<dyn ContextStore>,
    ) -> Self {
        Self {
            normalizer: QueryNormalizer::new(understanding),
            resolver: LocationResolver::new(autocomplete),
            provider,
            history,
            store,
        }
    }

    /// Handle one user turn. `user_id` of `None` means a guest: no context
    /// is loaded or saved and no history is recorded, but the turn follows
    /// the same path otherwise.
    pub async fn handle_query(&self, user_id: Option<&str>, message: &str) -> SearchOutcome {
        let message = message.trim();
        if message.is_empty() {
            return SearchOutcome::validation("message is required");
        }

        let context = match user_id {
            Some(id) => match self.store.get(id).await {
                Ok(ctx) => ctx,
                Err(err) => {
                    warn!(user = id, error = %err, "context store unavailable, continuing without memory");
                    None
                }
            },
            None => None,
        };

        let today = Utc::now().date_naive();
        let intent = self
            .normalizer
            .normalize(message, context.as_ref(), today)
            .await;

        match intent {
            ParsedIntent::Qa(reply) => SearchOutcome::conversational(reply),
            ParsedIntent::Error { follow_up } => SearchOutcome::clarification(follow_up),
            ParsedIntent::Search(search) => self.run_search(user_id, search).await,
        }
    }

    async fn run_search(&self, user_id: Option<&str>, search: ResolvedSearch) -> SearchOutcome {
        // Origin and destination resolution are independent; run them
        // concurrently and join before the provider call.
        let (origin, destination) = tokio::join!(
            self.resolver.resolve(&search.origin),
            self.resolver.resolve(&search.destination)
        );

        let query = FlightQuery {
            origin,
            destination,
            departure_date: search.departure_date,
            return_date: search.return_date,
            passengers: search.passengers,
            travel_class: search.travel_class,
        };

        // Best-effort memory write; a failed save never fails the turn.
        if let Some(id) = user_id {
            let update = ContextUpdate {
                origin: Some(query.origin.clone()),
                destination: Some(query.destination.clone()),
                travel_class: Some(query.travel_class),
                passengers: Some(query.passengers),
                dates: TripDates {
                    departure: Some(query.departure_date),
                    return_date: query.return_date,
                },
            };
            if let Err(err) = self.store.set(id, update).await {
                warn!(user = id, error = %err, "failed to persist context");
            }
        }

        match self.provider.search(&query).await {
            Ok(flights) => {
                if let Some(id) = user_id {
                    self.record_history(id, &query);
                }
                let message = format!(
                    "Found {} flights from {} to {}.",
                    flights.len(),
                    query.origin,
                    query.destination
                );
                debug!(user = user_id.unwrap_or("guest"), count = flights.len(), "search complete");
                SearchOutcome {
                    success: true,
                    message,
                    flights: flights.clone(),
                    assistant_intent: AssistantIntent::Search,
                    search_payload: Some(SearchPayload {
                        query,
                        results: flights,
                    }),
                }
            }
            Err(err) => degraded_outcome(err),
        }
    }

    /// Fire-and-forget history write; failures are logged, never surfaced.
    fn record_history(&self, user_id: &str, query: &FlightQuery) {
        let sink = Arc::clone(&self.history);
        let user_id = user_id.to_string();
        let query = query.clone();
        tokio::spawn(async move {
            if let Err(err) = sink.record(&user_id, &query).await {
                warn!(user = %user_id, error = %err, "failed to record search history");
            }
        });
    }
}

/// Map a provider failure onto a user-facing turn. Retries already happened
/// inside the search client; whatever reaches here is final for this turn.
fn degraded_outcome(err: SearchError) -> SearchOutcome {
    match err {
        SearchError::InvalidRequest { detail, .. } => {
            debug!(detail = %detail, "provider rejected search parameters");
            SearchOutcome::clarification(format!("I couldn't complete that search: {detail}"))
        }
        err if err.is_transient() => {
            warn!(error = %err, "flight search unavailable after retries");
            SearchOutcome::clarification(
                "Flight search is temporarily unavailable. Please try again in a moment.",
            )
        }
        err => {
            error!(error = %err, "flight search failed");
            SearchOutcome::clarification(
                "Something went wrong while searching for flights. Please try again shortly.",
            )
        }
    }
}
