//! Amadeus Self-Service API client.
//!
//! Implements `FlightProvider` (flight-offers search) and `Autocomplete`
//! (location keyword lookup) with an OAuth2 client-credentials token flow.

mod api;
mod client;
mod config;
mod offers;

pub use client::AmadeusClient;
pub use config::{AmadeusConfig, Environment};
