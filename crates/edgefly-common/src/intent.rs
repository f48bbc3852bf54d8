//! Parsed intent, the normalizer's output.

use chrono::NaiveDate;

use crate::types::{SearchPreferences, TravelClass};

/// Classification of one user turn after normalization.
///
/// `Search` is only constructed once origin, destination, and departure date
/// are all present; anything unresolvable is downgraded to `Error` with a
/// clarification follow-up, never left semantically invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedIntent {
    /// A complete, executable flight search.
    Search(ResolvedSearch),
    /// Conversational question/answer; the reply text goes straight back.
    Qa(String),
    /// Unresolvable turn; `follow_up` asks the user for what is missing.
    Error { follow_up: String },
}

impl ParsedIntent {
    pub fn error(follow_up: impl Into<String>) -> Self {
        Self::Error {
            follow_up: follow_up.into(),
        }
    }
}

/// Search fields guaranteed present by normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSearch {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub travel_class: TravelClass,
    pub passengers: u8,
    pub preferences: SearchPreferences,
}
