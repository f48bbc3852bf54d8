//! FlightProvider and Autocomplete trait implementations for AmadeusClient.

use async_trait::async_trait;
use tracing::debug;

use edgefly_common::{CanonicalFlightOffer, FlightQuery};

use crate::{Autocomplete, FlightProvider, LocationSuggestion, SearchError};

use super::client::AmadeusClient;
use super::offers::map_offers;

impl AmadeusClient {
    async fn search_once(
        &self,
        query: &FlightQuery,
    ) -> Result<Vec<CanonicalFlightOffer>, SearchError> {
        let mut params = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.to_string()),
            ("adults", query.passengers.to_string()),
            ("travelClass", query.travel_class.as_str().to_string()),
            ("currencyCode", self.config.currency.clone()),
            ("max", self.config.max_offers.to_string()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate", return_date.to_string()));
        }

        let json = self.get_json("/v2/shopping/flight-offers", &params).await?;
        Ok(map_offers(&json["data"]))
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    async fn search(&self, query: &FlightQuery) -> Result<Vec<CanonicalFlightOffer>, SearchError> {
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            departure = %query.departure_date,
            "flight-offers search"
        );
        let offers = self
            .retry
            .run(SearchError::is_transient, || self.search_once(query))
            .await?;
        debug!(count = offers.len(), "flight-offers search complete");
        Ok(offers)
    }
}

#[async_trait]
impl Autocomplete for AmadeusClient {
    async fn lookup(&self, keyword: &str) -> Result<Vec<LocationSuggestion>, SearchError> {
        let params = [
            ("keyword", keyword.to_string()),
            ("subType", "AIRPORT,CITY".to_string()),
            ("page[limit]", "5".to_string()),
        ];
        let json = self.get_json("/v1/reference-data/locations", &params).await?;

        let suggestions = json["data"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|loc| {
                        let code = loc["iataCode"].as_str()?.to_string();
                        Some(LocationSuggestion {
                            code,
                            name: loc["name"].as_str().map(str::to_string),
                            city: loc["address"]["cityName"].as_str().map(str::to_string),
                            country: loc["address"]["countryName"].as_str().map(str::to_string),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(suggestions)
    }
}
