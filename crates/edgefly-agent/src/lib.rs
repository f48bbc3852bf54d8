//! Conversational flight-search pipeline for EdgeFly.
//!
//! Turns a free-text user message into either a conversational answer or a
//! validated, resolved flight search, then drives that search against the
//! upstream provider. Components, leaves first:
//!
//! - [`store`] — short-lived per-user conversational memory with lazy TTL
//!   expiry.
//! - [`resolver`] — free text to IATA code, short-circuiting codes that are
//!   already valid.
//! - [`normalize`] — defaults, relative-date and duration parsing, intent
//!   classification with a deterministic heuristic fallback.
//! - [`history`] — fire-and-forget persistence of resolved searches.
//! - [`pipeline`] — the orchestrator tying it all together behind one
//!   operation, [`Agent::handle_query`].

pub mod dates;
pub mod history;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod store;

pub use history::{HistoryError, HistorySink, NullHistory};
pub use normalize::QueryNormalizer;
pub use pipeline::Agent;
pub use resolver::LocationResolver;
pub use store::{ContextStore, ContextUpdate, MemoryStore, StoreError};
