//! Query normalization: free text plus remembered context in, a fully
//! classified `ParsedIntent` out.
//!
//! The classifier's structured reply is the first resolution strategy; a
//! deterministic heuristic takes over when the model is unusable. A turn
//! only becomes `Search` once origin, destination, and departure date are
//! all present; otherwise it is downgraded to a clarification.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use edgefly_ai::{DraftIntent, LanguageUnderstanding};
use edgefly_common::{ParsedIntent, ResolvedSearch, UserContext};

use crate::dates;


const QA_FALLBACK: &str = "I didn't find any flights for that.";
const ERROR_FALLBACK: &str = "Sorry, I couldn't understand that request.";

pub struct QueryNormalizer {
    understanding: Arc<dyn LanguageUnderstanding>,
}

impl QueryNormalizer {
    pub fn new(understanding: Arc<dyn LanguageUnderstanding>) -> Self {
        Self { understanding }
    }

    /// Classify and normalize one user turn. `today` anchors relative-date
    /// parsing so behavior is deterministic under test.
    pub async fn normalize(
        &self,
        message: &str,
        context: Option<&UserContext>,
        today: NaiveDate,
    ) -> ParsedIntent {
        let draft = match self.understanding.classify(message, context).await {
            Ok(raw) => DraftIntent::from_reply(&raw),
            Err(err) => {
                warn!(error = %err, "classifier unavailable, using heuristic fallback");
                heuristic_draft(message, today)
            }
        };
        finalize(draft, message, context, today)
    }
}

/// Deterministic fallback when the language model is unusable: a date
/// expression in the text implies a search with defaults; without one the
/// turn cannot proceed and asks for a date.
fn heuristic_draft(message: &str, today: NaiveDate) -> DraftIntent {
    match dates::first_date_in(message, today) {
        Some(date) => DraftIntent {
            intent: Some("search".to_string()),
            departure_date: Some(date),
            ..DraftIntent::default()
        },
        None => DraftIntent {
            intent: Some("error".to_string()),
            follow_up: Some(
                "I couldn't quite work that out. When would you like to depart?".to_string(),
            ),
            ..DraftIntent::default()
        },
    }
}

enum Kind {
    Search,
    Qa,
    Error,
}

/// Intent aliasing: upstream spellings of "search" vary.
fn classify(intent: Option<&str>) -> Kind {
    let Some(raw) = intent else {
        return Kind::Qa;
    };
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "search" | "flight_search" | "find_flights" => Kind::Search,
        "error" => Kind::Error,
        _ if lowered.contains("flight") || lowered.contains("search") => Kind::Search,
        _ => Kind::Qa,
    }
}

fn finalize(
    draft: DraftIntent,
    message: &str,
    context: Option<&UserContext>,
    today: NaiveDate,
) -> ParsedIntent {
    match classify(draft.intent.as_deref()) {
        Kind::Qa => ParsedIntent::Qa(
            draft
                .reply_text
                .or(draft.follow_up)
                .unwrap_or_else(|| QA_FALLBACK.to_string()),
        ),
        Kind::Error => ParsedIntent::error(
            draft
                .follow_up
                .unwrap_or_else(|| ERROR_FALLBACK.to_string()),
        ),
        Kind::Search => finalize_search(draft, message, context, today),
    }
}

fn finalize_search(
    mut draft: DraftIntent,
    message: &str,
    context: Option<&UserContext>,
    today: NaiveDate,
) -> ParsedIntent {
    let one_way = dates::is_one_way(message);

    // Dates from the raw text when the structured reply lacked them.
    if draft.departure_date.is_none() {
        draft.departure_date = dates::first_date_in(message, today);
    }
    if draft.return_date.is_none() && !one_way {
        if let (Some(days), Some(departure)) = (dates::duration_days(message), draft.departure_date)
        {
            draft.return_date = Some(departure + chrono::Duration::days(days));
        }
    }
    if one_way {
        draft.return_date = None;
    }

    // Continuity: fields still unset inherit from the remembered turn.
    if let Some(ctx) = context {
        draft.origin = draft.origin.or_else(|| ctx.last_origin.clone());
        draft.destination = draft.destination.or_else(|| ctx.last_destination.clone());
        draft.travel_class = draft.travel_class.or(ctx.last_travel_class);
        if draft.passengers.is_none() {
            draft.passengers = ctx.last_passengers.map(i64::from);
        }
        draft.departure_date = draft.departure_date.or(ctx.last_dates.departure);
        if !one_way {
            draft.return_date = draft.return_date.or(ctx.last_dates.return_date);
        }
    }

    // A one-way request never gets asked for a return date.
    let follow_up = draft
        .follow_up
        .take()
        .filter(|f| !(one_way && f.to_ascii_lowercase().contains("return")));

    // Never fabricate origin/destination/date; ask instead.
    let Some(origin) = draft.origin else {
        return ParsedIntent::error(
            follow_up.unwrap_or_else(|| "Where will you be flying from?".to_string()),
        );
    };
    let Some(destination) = draft.destination else {
        return ParsedIntent::error(
            follow_up.unwrap_or_else(|| "Where would you like to fly to?".to_string()),
        );
    };
    let Some(departure_date) = draft.departure_date else {
        return ParsedIntent::error(
            follow_up.unwrap_or_else(|| "When would you like to depart?".to_string()),
        );
    };

    let passengers = match draft.passengers {
        Some(n @ 1..=9) => n as u8,
        Some(n) => {
            debug!(passengers = n, "passenger count out of range, defaulting to 1");
            1
        }
        None => 1,
    };

    ParsedIntent::Search(ResolvedSearch {
        origin,
        destination,
        departure_date,
        return_date: draft.return_date,
        travel_class: draft.travel_class.unwrap_or_default(),
        passengers,
        preferences: draft.preferences,
    })
}
