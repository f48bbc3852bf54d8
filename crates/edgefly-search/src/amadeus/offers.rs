//! Canonical-offer mapping from raw Amadeus payloads.
//!
//! This is the single place raw provider shapes are interpreted; everything
//! downstream consumes `CanonicalFlightOffer`. Missing optional fields stay
//! `None`, and one malformed offer never aborts mapping the rest.

use serde::Deserialize;
use tracing::warn;

use edgefly_common::{CanonicalFlightOffer, FlightSegment, Itinerary, SegmentPoint};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOffer {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    validating_airline_codes: Vec<String>,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    itineraries: Vec<RawItinerary>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    #[serde(default)]
    total: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItinerary {
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    #[serde(default)]
    departure: Option<SegmentPoint>,
    #[serde(default)]
    arrival: Option<SegmentPoint>,
    #[serde(default)]
    carrier_code: Option<String>,
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

/// Map the `data` array of a flight-offers response. Offers that fail to
/// deserialize are skipped with a warning.
pub(crate) fn map_offers(data: &serde_json::Value) -> Vec<CanonicalFlightOffer> {
    let Some(list) = data.as_array() else {
        return Vec::new();
    };

    list.iter()
        .enumerate()
        .filter_map(|(index, item)| {
            match serde_json::from_value::<RawOffer>(item.clone()) {
                Ok(raw) => Some(map_offer(raw, index)),
                Err(err) => {
                    warn!(index, error = %err, "skipping unmappable flight offer");
                    None
                }
            }
        })
        .collect()
}

fn map_offer(raw: RawOffer, index: usize) -> CanonicalFlightOffer {
    let (total_price, currency) = raw
        .price
        .map(|p| (p.total, p.currency))
        .unwrap_or((None, None));

    CanonicalFlightOffer {
        id: raw.id.unwrap_or_else(|| (index + 1).to_string()),
        airline: raw.validating_airline_codes.into_iter().next(),
        total_price,
        currency,
        itineraries: raw
            .itineraries
            .into_iter()
            .map(|itin| Itinerary {
                duration: itin.duration,
                segments: itin.segments.into_iter().map(map_segment).collect(),
            })
            .collect(),
    }
}

fn map_segment(raw: RawSegment) -> FlightSegment {
    FlightSegment {
        departure: raw.departure,
        arrival: raw.arrival,
        carrier_code: raw.carrier_code,
        number: raw.number,
        duration: raw.duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_complete_offer() {
        let data = serde_json::json!([{
            "id": "1",
            "validatingAirlineCodes": ["EK", "QF"],
            "price": { "total": "842.40", "currency": "USD" },
            "itineraries": [{
                "duration": "PT7H05M",
                "segments": [{
                    "departure": { "iataCode": "LHR", "terminal": "3", "at": "2026-09-04T09:40:00" },
                    "arrival": { "iataCode": "DXB", "at": "2026-09-04T19:45:00" },
                    "carrierCode": "EK",
                    "number": "4",
                    "duration": "PT7H05M"
                }]
            }]
        }]);

        let offers = map_offers(&data);
        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.id, "1");
        assert_eq!(offer.airline.as_deref(), Some("EK"));
        assert_eq!(offer.total_price.as_deref(), Some("842.40"));
        assert_eq!(offer.currency.as_deref(), Some("USD"));
        assert_eq!(offer.itineraries.len(), 1);
        let segment = &offer.itineraries[0].segments[0];
        assert_eq!(
            segment.departure.as_ref().unwrap().iata_code.as_deref(),
            Some("LHR")
        );
        assert_eq!(segment.carrier_code.as_deref(), Some("EK"));
    }

    #[test]
    fn missing_nested_fields_do_not_abort_mapping() {
        let data = serde_json::json!([
            { "id": "1" },
            { "price": { "total": "99.00" } },
            { "itineraries": [{ "segments": [{}] }] }
        ]);

        let offers = map_offers(&data);
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].airline, None);
        assert!(offers[0].itineraries.is_empty());
        // Offers without an id get a positional one.
        assert_eq!(offers[1].id, "2");
        assert_eq!(offers[1].total_price.as_deref(), Some("99.00"));
        assert_eq!(offers[1].currency, None);
        assert_eq!(offers[2].itineraries[0].segments.len(), 1);
        assert_eq!(offers[2].itineraries[0].segments[0].departure, None);
    }

    #[test]
    fn malformed_offer_is_skipped_not_fatal() {
        let data = serde_json::json!([
            { "id": "good" },
            { "itineraries": "not-an-array" }
        ]);
        let offers = map_offers(&data);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, "good");
    }

    #[test]
    fn non_array_data_maps_to_empty() {
        assert!(map_offers(&serde_json::json!(null)).is_empty());
        assert!(map_offers(&serde_json::json!({"unexpected": true})).is_empty());
    }
}
