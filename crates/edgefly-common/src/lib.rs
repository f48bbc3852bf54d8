//! Shared domain types for the EdgeFly conversational flight-search core.
//!
//! Everything that crosses a crate boundary lives here: travel enums, the
//! per-user conversational context, the canonical flight-offer shape, the
//! parsed intent produced by query normalization, and the unified
//! `SearchOutcome` contract the pipeline returns on every turn.

pub mod intent;
pub mod offer;
pub mod outcome;
pub mod types;

pub use intent::{ParsedIntent, ResolvedSearch};
pub use offer::{CanonicalFlightOffer, FlightSegment, Itinerary, SegmentPoint};
pub use outcome::{AssistantIntent, SearchOutcome, SearchPayload};
pub use types::{FlightQuery, SearchPreferences, SortOrder, TravelClass, TripDates, UserContext};
