//! Free text to IATA code resolution.

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use edgefly_search::Autocomplete;

static IATA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

/// Resolves a user-supplied location to an IATA code via the autocomplete
/// collaborator, short-circuiting inputs that already are codes.
pub struct LocationResolver {
    autocomplete: Arc<dyn Autocomplete>,
}

impl LocationResolver {
    pub fn new(autocomplete: Arc<dyn Autocomplete>) -> Self {
        Self { autocomplete }
    }

    /// Resolve `text` to a code, or hand back the original text when lookup
    /// fails or finds nothing. Resolution degrades gracefully: a downstream
    /// search with raw text may still fail provider-side with "not found",
    /// which is an expected, reportable outcome.
    pub async fn resolve(&self, text: &str) -> String {
        let text = text.trim();
        if IATA_RE.is_match(text) {
            return text.to_string();
        }

        match self.autocomplete.lookup(text).await {
            Ok(suggestions) => match suggestions.into_iter().next() {
                Some(suggestion) => {
                    debug!(keyword = text, code = %suggestion.code, "location resolved");
                    suggestion.code
                }
                None => {
                    debug!(keyword = text, "no autocomplete suggestions, keeping raw text");
                    text.to_string()
                }
            },
            Err(err) => {
                warn!(keyword = text, error = %err, "autocomplete lookup failed, keeping raw text");
                text.to_string()
            }
        }
    }
}
