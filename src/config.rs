//! Configuration management for the Weather MCP Server
//!
//! Handles environment variables and defaults for the upstream API and the
//! REST listener.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Configuration for the Weather MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Open-Meteo API
    pub api_base_url: String,

    /// Timeout applied to each outbound weather request
    pub request_timeout: Duration,

    /// Host the REST variant binds to
    pub http_host: String,

    /// Port the REST variant binds to
    pub http_port: u16,
}

impl Config {
    /// Create a configuration from the process environment
    pub fn new() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("WEATHER_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| open_meteo::API_BASE_URL.to_string());

        let timeout_secs = match lookup("WEATHER_TIMEOUT_SECS") {
            Some(value) => parse_var("WEATHER_TIMEOUT_SECS", &value)?,
            None => open_meteo::DEFAULT_TIMEOUT_SECS,
        };

        let http_host = lookup("WEATHER_HTTP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let http_port = match lookup("WEATHER_HTTP_PORT") {
            Some(value) => parse_var("WEATHER_HTTP_PORT", &value)?,
            None => 5000,
        };

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            http_host,
            http_port,
        })
    }

    /// Socket address for the REST listener
    pub fn http_addr(&self) -> Result<SocketAddr> {
        let address = format!("{}:{}", self.http_host, self.http_port);
        address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress { address }.into())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: open_meteo::API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(open_meteo::DEFAULT_TIMEOUT_SECS),
            http_host: "127.0.0.1".to_string(),
            http_port: 5000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidEnvVar {
            var: var.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

/// Open-Meteo API constants
pub mod open_meteo {
    /// Base URL for the Open-Meteo API
    pub const API_BASE_URL: &str = "https://api.open-meteo.com/v1";

    /// Current-conditions variable requested from the forecast endpoint
    pub const CURRENT_VARIABLE: &str = "temperature_2m";

    /// Unit reported for `temperature_2m`
    pub const TEMPERATURE_UNIT: &str = "°C";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.http_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("WEATHER_API_URL", "http://localhost:9000/v1/"),
            ("WEATHER_TIMEOUT_SECS", "3"),
            ("WEATHER_HTTP_PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = Config::from_lookup(lookup_from(&[("WEATHER_HTTP_PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_host_rejected() {
        let config = Config {
            http_host: "not a host".to_string(),
            ..Config::default()
        };
        assert!(config.http_addr().is_err());
    }
}
