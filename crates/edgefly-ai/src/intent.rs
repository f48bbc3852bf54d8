//! Intent draft extraction from a raw model reply.
//!
//! The classifier answers either in plain text (chat) or with a JSON object
//! embedded somewhere in the reply (search/error). Extraction is defensive:
//! the first balanced top-level object is located by hand, parsed leniently
//! field by field, and any failure degrades to a draft the normalizer can
//! still work with.

use chrono::NaiveDate;
use serde_json::Value;

use edgefly_common::{SearchPreferences, SortOrder, TravelClass};

/// Pre-normalization intent fields pulled out of a classifier reply.
///
/// Everything is optional; the query normalizer fills defaults, inherits
/// from context, and decides the final `ParsedIntent` variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftIntent {
    /// Raw intent string as the model wrote it ("search", "Q/A", ...).
    /// `None` means the reply carried no structured object at all.
    pub intent: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub travel_class: Option<TravelClass>,
    pub passengers: Option<i64>,
    pub preferences: SearchPreferences,
    pub follow_up: Option<String>,
    /// Conversational text with the JSON block and code fences removed.
    pub reply_text: Option<String>,
}

impl DraftIntent {
    /// Parse a raw classifier reply into a draft.
    ///
    /// No JSON object in the reply means a plain conversational turn. A JSON
    /// block that fails to parse becomes an error draft with a canned
    /// follow-up, matching how the assistant apologizes for garbled output.
    pub fn from_reply(raw: &str) -> Self {
        let Some(block) = extract_first_json(raw) else {
            let text = clean_fences(raw);
            return Self {
                reply_text: if text.is_empty() { None } else { Some(text) },
                ..Self::default()
            };
        };

        let parsed: Value = match serde_json::from_str(block) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "classifier JSON block failed to parse");
                return Self {
                    intent: Some("error".to_string()),
                    follow_up: Some("Sorry, I couldn't understand that properly.".to_string()),
                    ..Self::default()
                };
            }
        };

        let reply_text = visible_text(raw, block, &parsed);
        Self {
            intent: non_empty(&parsed, "intent"),
            origin: non_empty(&parsed, "origin"),
            destination: non_empty(&parsed, "destination"),
            departure_date: non_empty(&parsed, "departureDate").and_then(|s| loose_date(&s)),
            return_date: non_empty(&parsed, "returnDate").and_then(|s| loose_date(&s)),
            travel_class: non_empty(&parsed, "travelClass").and_then(|s| TravelClass::parse(&s)),
            passengers: passenger_count(&parsed),
            preferences: preferences(&parsed),
            follow_up: non_empty(&parsed, "followUp"),
            reply_text,
        }
    }
}

/// Locate the first balanced top-level JSON object in free text.
///
/// Walks the text with a brace depth counter, skipping string literals and
/// escapes, so prose containing stray braces after the object does not
/// extend the match the way a greedy regex would.
pub fn extract_first_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Conversational text around the JSON block, if any survives stripping.
fn visible_text(raw: &str, block: &str, parsed: &Value) -> Option<String> {
    let stripped = clean_fences(&raw.replacen(block, "", 1));
    if !stripped.is_empty() {
        return Some(stripped);
    }
    // The model sometimes tucks the visible reply inside the object instead.
    for key in ["message", "response", "reply"] {
        if let Some(text) = non_empty(parsed, key) {
            return Some(text);
        }
    }
    None
}

fn clean_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn non_empty(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(str::to_string)
}

fn passenger_count(value: &Value) -> Option<i64> {
    let field = value.get("passengers")?;
    field
        .as_i64()
        .or_else(|| field.as_str().and_then(|s| s.trim().parse().ok()))
}

fn preferences(value: &Value) -> SearchPreferences {
    let Some(prefs) = value.get("preferences") else {
        return SearchPreferences::default();
    };
    SearchPreferences {
        sort: non_empty(prefs, "sort")
            .and_then(|s| SortOrder::parse(&s))
            .unwrap_or_default(),
        max_price: prefs.get("maxPrice").and_then(Value::as_f64),
        airlines: prefs
            .get("airlines")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Accept the handful of date spellings the classifier actually produces.
fn loose_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}
