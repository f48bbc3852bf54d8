//! End-to-end pipeline behavior over mocked collaborators.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use edgefly_ai::{AiError, LanguageUnderstanding};
use edgefly_common::{
    AssistantIntent, CanonicalFlightOffer, FlightQuery, TravelClass, UserContext,
};
use edgefly_search::{Autocomplete, FlightProvider, LocationSuggestion, SearchError};

use crate::history::{HistoryError, HistorySink};
use crate::store::{ContextStore, MemoryStore};

use super::Agent;

struct Scripted {
    reply: String,
}

#[async_trait]
impl LanguageUnderstanding for Scripted {
    async fn classify(
        &self,
        _message: &str,
        _context: Option<&UserContext>,
    ) -> Result<String, AiError> {
        Ok(self.reply.clone())
    }
}

struct MapAutocomplete {
    entries: Vec<(&'static str, &'static str)>,
    calls: AtomicU32,
}

impl MapAutocomplete {
    fn new(entries: &[(&'static str, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            entries: entries.to_vec(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl Autocomplete for MapAutocomplete {
    async fn lookup(&self, keyword: &str) -> Result<Vec<LocationSuggestion>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(keyword))
            .map(|(_, code)| LocationSuggestion {
                code: code.to_string(),
                name: None,
                city: None,
                country: None,
            })
            .collect())
    }
}

struct StubProvider {
    offers: usize,
    fail_status: Option<u16>,
    calls: AtomicU32,
    last_query: Mutex<Option<FlightQuery>>,
}

impl StubProvider {
    fn returning(offers: usize) -> Arc<Self> {
        Arc::new(Self {
            offers,
            fail_status: None,
            calls: AtomicU32::new(0),
            last_query: Mutex::new(None),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            offers: 0,
            fail_status: Some(status),
            calls: AtomicU32::new(0),
            last_query: Mutex::new(None),
        })
    }
}

#[async_trait]
impl FlightProvider for StubProvider {
    async fn search(&self, query: &FlightQuery) -> Result<Vec<CanonicalFlightOffer>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        if let Some(status) = self.fail_status {
            return Err(SearchError::from_status(
                status,
                "no flights found for these dates",
            ));
        }
        Ok((1..=self.offers)
            .map(|n| CanonicalFlightOffer {
                id: n.to_string(),
                ..CanonicalFlightOffer::default()
            })
            .collect())
    }
}

#[derive(Default)]
struct RecordingHistory {
    records: Mutex<Vec<(String, FlightQuery)>>,
}

#[async_trait]
impl HistorySink for RecordingHistory {
    async fn record(&self, user_id: &str, query: &FlightQuery) -> Result<(), HistoryError> {
        self.records
            .lock()
            .unwrap()
            .push((user_id.to_string(), query.clone()));
        Ok(())
    }
}

fn agent(
    reply: &str,
    autocomplete: Arc<MapAutocomplete>,
    provider: Arc<StubProvider>,
    history: Arc<RecordingHistory>,
    store: Arc<MemoryStore>,
) -> Agent {
    Agent::new(
        Arc::new(Scripted {
            reply: reply.to_string(),
        }),
        autocomplete,
        provider,
        history,
        store,
    )
}

/// Let the spawned history task run to completion.
async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn end_to_end_search_resolves_locations_and_counts_offers() {
    let autocomplete = MapAutocomplete::new(&[("London", "LON"), ("Paris", "CDG")]);
    let provider = StubProvider::returning(2);
    let history = Arc::new(RecordingHistory::default());
    let store = Arc::new(MemoryStore::new());
    let reply = r#"{"intent":"search","origin":"London","destination":"Paris","departureDate":"2026-09-05"}"#;
    let agent = agent(reply, autocomplete.clone(), provider.clone(), history.clone(), store.clone());

    let outcome = agent.handle_query(Some("u1"), "flights to Paris tomorrow").await;

    assert!(outcome.success);
    assert_eq!(outcome.assistant_intent, AssistantIntent::Search);
    assert_eq!(outcome.flights.len(), 2);
    assert_eq!(outcome.message, "Found 2 flights from LON to CDG.");
    let payload = outcome.search_payload.expect("payload present");
    assert_eq!(payload.query.origin, "LON");
    assert_eq!(payload.query.destination, "CDG");
    assert_eq!(payload.results.len(), 2);
    // Both ends resolved via autocomplete.
    assert_eq!(autocomplete.calls.load(Ordering::SeqCst), 2);

    // Context and history were persisted.
    settle().await;
    let ctx = store.get("u1").await.unwrap().expect("context saved");
    assert_eq!(ctx.last_origin.as_deref(), Some("LON"));
    let records = history.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, "u1");
    assert_eq!(records[0].1.destination, "CDG");
}

#[tokio::test]
async fn iata_codes_skip_autocomplete_entirely() {
    let autocomplete = MapAutocomplete::new(&[]);
    let provider = StubProvider::returning(1);
    let reply = r#"{"intent":"search","origin":"JFK","destination":"LAX","departureDate":"2026-09-05"}"#;
    let agent = agent(
        reply,
        autocomplete.clone(),
        provider,
        Arc::new(RecordingHistory::default()),
        Arc::new(MemoryStore::new()),
    );

    let outcome = agent.handle_query(Some("u1"), "JFK to LAX saturday").await;
    assert!(outcome.success);
    assert_eq!(autocomplete.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn guest_turn_skips_context_and_history() {
    let provider = StubProvider::returning(1);
    let history = Arc::new(RecordingHistory::default());
    let store = Arc::new(MemoryStore::new());
    let reply = r#"{"intent":"search","origin":"LON","destination":"CDG","departureDate":"2026-09-05"}"#;
    let agent = agent(reply, MapAutocomplete::new(&[]), provider, history.clone(), store.clone());

    let outcome = agent.handle_query(None, "flights to Paris").await;
    assert!(outcome.success);
    assert_eq!(outcome.assistant_intent, AssistantIntent::Search);

    settle().await;
    assert!(history.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_message_is_the_only_validation_failure() {
    let agent = agent(
        "unused",
        MapAutocomplete::new(&[]),
        StubProvider::returning(0),
        Arc::new(RecordingHistory::default()),
        Arc::new(MemoryStore::new()),
    );

    let outcome = agent.handle_query(Some("u1"), "   ").await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "message is required");
}

#[tokio::test]
async fn conversational_turn_never_calls_the_provider() {
    let provider = StubProvider::returning(5);
    let agent = agent(
        "We fly to over 300 destinations worldwide.",
        MapAutocomplete::new(&[]),
        provider.clone(),
        Arc::new(RecordingHistory::default()),
        Arc::new(MemoryStore::new()),
    );

    let outcome = agent.handle_query(Some("u1"), "where do you fly?").await;
    assert!(outcome.success);
    assert_eq!(outcome.assistant_intent, AssistantIntent::Qa);
    assert_eq!(outcome.message, "We fly to over 300 destinations worldwide.");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn clarification_turn_is_a_successful_turn() {
    let provider = StubProvider::returning(5);
    let reply = r#"{"intent":"search","origin":"LON","destination":"CDG"}"#;
    let agent = agent(
        reply,
        MapAutocomplete::new(&[]),
        provider.clone(),
        Arc::new(RecordingHistory::default()),
        Arc::new(MemoryStore::new()),
    );

    let outcome = agent.handle_query(Some("u1"), "flights to Paris sometime").await;
    assert!(outcome.success);
    assert_eq!(outcome.assistant_intent, AssistantIntent::Error);
    assert!(!outcome.message.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_outage_degrades_without_failing_the_turn() {
    let provider = StubProvider::failing(503);
    let reply = r#"{"intent":"search","origin":"LON","destination":"CDG","departureDate":"2026-09-05"}"#;
    let agent = agent(
        reply,
        MapAutocomplete::new(&[]),
        provider,
        Arc::new(RecordingHistory::default()),
        Arc::new(MemoryStore::new()),
    );

    let outcome = agent.handle_query(Some("u1"), "flights to Paris").await;
    assert!(outcome.success);
    assert_eq!(outcome.assistant_intent, AssistantIntent::Error);
    assert!(outcome.message.contains("temporarily unavailable"));
    assert!(outcome.flights.is_empty());
}

#[tokio::test]
async fn provider_rejection_surfaces_the_detail() {
    let provider = StubProvider::failing(400);
    let reply = r#"{"intent":"search","origin":"LON","destination":"CDG","departureDate":"2026-09-05"}"#;
    let agent = agent(
        reply,
        MapAutocomplete::new(&[]),
        provider,
        Arc::new(RecordingHistory::default()),
        Arc::new(MemoryStore::new()),
    );

    let outcome = agent.handle_query(Some("u1"), "flights to Paris").await;
    assert!(outcome.success);
    assert!(outcome.message.contains("no flights found for these dates"));
}

#[tokio::test]
async fn follow_up_turn_inherits_remembered_context() {
    let provider = StubProvider::returning(1);
    let store = Arc::new(MemoryStore::new());
    let first = r#"{"intent":"search","origin":"LON","destination":"CDG","departureDate":"2026-09-05"}"#;
    let agent1 = agent(
        first,
        MapAutocomplete::new(&[]),
        provider.clone(),
        Arc::new(RecordingHistory::default()),
        store.clone(),
    );
    agent1.handle_query(Some("u1"), "flights to Paris").await;

    // Second turn only states the cabin change; the rest comes from memory.
    let second = r#"{"intent":"search","travelClass":"BUSINESS"}"#;
    let agent2 = agent(
        second,
        MapAutocomplete::new(&[]),
        provider.clone(),
        Arc::new(RecordingHistory::default()),
        store,
    );
    let outcome = agent2
        .handle_query(Some("u1"), "what about business class?")
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.assistant_intent, AssistantIntent::Search);
    let query = provider.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.origin, "LON");
    assert_eq!(query.destination, "CDG");
    assert_eq!(query.travel_class, TravelClass::Business);
}
