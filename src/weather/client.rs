//! Open-Meteo weather client
//!
//! Resolves a city against the registry and fetches its current temperature.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::open_meteo::CURRENT_VARIABLE;
use crate::config::Config;
use crate::error::Result;
use crate::weather::cities::{display_name, City, CityRegistry};
use crate::weather::types::{CurrentWeather, ForecastResponse, WeatherReport};

/// Source of weather reports for the tools and the REST adapter.
///
/// Implementations never fail for a well-formed city name: unsupported cities
/// and upstream failures come back as `WeatherReport::Failed`.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Look up the current weather for `city`
    async fn lookup(&self, city: &str) -> WeatherReport;

    /// Registry of supported cities
    fn cities(&self) -> &CityRegistry;
}

/// Open-Meteo API client
pub struct WeatherClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Base URL of the forecast API
    base_url: String,

    /// Supported cities
    cities: Arc<CityRegistry>,
}

impl WeatherClient {
    /// Create a new weather client
    pub fn new(config: &Config, cities: Arc<CityRegistry>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.clone(),
            cities,
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    async fn fetch_forecast(&self, city: &City) -> std::result::Result<ForecastResponse, reqwest::Error> {
        let latitude = city.latitude.to_string();
        let longitude = city.longitude.to_string();

        self.http_client
            .get(self.forecast_url())
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_VARIABLE),
                ("timezone", "auto"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    fn unsupported(&self, city: &str) -> WeatherReport {
        let available = self.cities.keys().collect::<Vec<_>>().join(", ");
        WeatherReport::failed(format!(
            "City '{}' not supported. Available: {}",
            city, available
        ))
    }
}

#[async_trait]
impl WeatherLookup for WeatherClient {
    async fn lookup(&self, city: &str) -> WeatherReport {
        let Some(entry) = self.cities.get(city) else {
            tracing::debug!("Rejected unsupported city: {}", city);
            return self.unsupported(city);
        };

        match self.fetch_forecast(entry).await {
            Ok(forecast) => {
                WeatherReport::Current(CurrentWeather::from_forecast(display_name(city.trim()), forecast))
            }
            Err(e) => {
                tracing::warn!("Weather request for {} failed: {}", entry.key, e);
                WeatherReport::failed(format!("Failed to fetch weather: {}", e))
            }
        }
    }

    fn cities(&self) -> &CityRegistry {
        &self.cities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WeatherClient {
        WeatherClient::new(&Config::default(), Arc::new(CityRegistry::default())).unwrap()
    }

    #[tokio::test]
    async fn test_unsupported_city_skips_network() {
        let report = client().lookup("mumbai").await;
        let error = report.error().unwrap();
        assert!(error.contains("not supported"));
        assert!(error.contains("City 'mumbai'"));
        assert!(error.ends_with("Available: bangalore, delhi"));
    }

    #[test]
    fn test_forecast_url() {
        let config = Config {
            api_base_url: "http://localhost:1234/v1".to_string(),
            ..Config::default()
        };
        let client = WeatherClient::new(&config, Arc::new(CityRegistry::default())).unwrap();
        assert_eq!(client.forecast_url(), "http://localhost:1234/v1/forecast");
    }
}
