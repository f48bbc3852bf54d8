//! Travel enums, per-user context, and the resolved search query.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Cabin class accepted by the upstream flight provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "ECONOMY",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }

    /// Lenient parse for values coming out of free text or an LLM reply.
    /// Unknown strings return `None`; callers fall back to the default.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "ECONOMY" | "COACH" => Some(Self::Economy),
            "PREMIUM_ECONOMY" | "PREMIUM" => Some(Self::PremiumEconomy),
            "BUSINESS" => Some(Self::Business),
            "FIRST" | "FIRST_CLASS" => Some(Self::First),
            _ => None,
        }
    }
}

/// Result ordering preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Cheapest,
    Shortest,
    Best,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cheapest" | "cheap" | "price" => Some(Self::Cheapest),
            "shortest" | "fastest" | "duration" => Some(Self::Shortest),
            "best" => Some(Self::Best),
            _ => None,
        }
    }
}

/// User preferences attached to a search intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPreferences {
    pub sort: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub airlines: Vec<String>,
}

/// Departure/return pair remembered across turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TripDates {
    pub departure: Option<NaiveDate>,
    #[serde(rename = "return")]
    pub return_date: Option<NaiveDate>,
}

/// Short-lived conversational memory for one user.
///
/// An entry older than the store TTL (3 hours) is treated as absent at read
/// time; see `edgefly-agent`'s context store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_travel_class: Option<TravelClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_passengers: Option<u8>,
    #[serde(default)]
    pub last_dates: TripDates,
    pub timestamp: DateTime<Utc>,
}

impl UserContext {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            last_origin: None,
            last_destination: None,
            last_travel_class: None,
            last_passengers: None,
            last_dates: TripDates::default(),
            timestamp,
        }
    }
}

/// Fully-resolved query sent to the flight provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    pub passengers: u8,
    pub travel_class: TravelClass,
}
