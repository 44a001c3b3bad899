//! Weather lookup module
//!
//! Contains the city registry, the Open-Meteo client and the report types the
//! tools hand back to callers.

pub mod cities;
pub mod client;
pub mod types;

pub use cities::{City, CityRegistry};
pub use client::{WeatherClient, WeatherLookup};
pub use types::WeatherReport;
