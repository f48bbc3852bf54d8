//! The unified contract the pipeline returns for every turn.

use serde::{Deserialize, Serialize};

use crate::offer::CanonicalFlightOffer;
use crate::types::FlightQuery;

/// What the assistant decided this turn was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssistantIntent {
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "Q/A")]
    Qa,
    #[serde(rename = "error")]
    Error,
}

/// Resolved query echoed back alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub query: FlightQuery,
    pub results: Vec<CanonicalFlightOffer>,
}

/// Outcome of one pipeline invocation.
///
/// `success` is `false` only for caller-input validation failures. A
/// clarification turn (the assistant asking for a missing date, say) is a
/// successful turn with `assistant_intent == Error`, and upstream outages
/// degrade to a successful turn carrying an explanatory message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub flights: Vec<CanonicalFlightOffer>,
    pub assistant_intent: AssistantIntent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_payload: Option<SearchPayload>,
}

impl SearchOutcome {
    /// Caller-input validation failure, the only `success: false` shape.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            flights: Vec::new(),
            assistant_intent: AssistantIntent::Error,
            search_payload: None,
        }
    }

    /// Conversational reply with no search performed.
    pub fn conversational(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            flights: Vec::new(),
            assistant_intent: AssistantIntent::Qa,
            search_payload: None,
        }
    }

    /// Clarification turn: the assistant needs more information.
    pub fn clarification(follow_up: impl Into<String>) -> Self {
        Self {
            success: true,
            message: follow_up.into(),
            flights: Vec::new(),
            assistant_intent: AssistantIntent::Error,
            search_payload: None,
        }
    }
}
