//! Error types for the Weather MCP Server
//!
//! Process-level failures live here. Protocol failures returned to clients are
//! `JsonRpcError` values (see `mcp::types`), and data-level lookup failures are
//! carried inside `WeatherReport::Failed`.

use thiserror::Error;

/// Main error type for the Weather MCP Server
#[derive(Error, Debug)]
pub enum WeatherMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidEnvVar { var: String, value: String },

    #[error("Invalid listen address: {address}")]
    InvalidAddress { address: String },
}

/// Result type alias for Weather MCP operations
pub type Result<T> = std::result::Result<T, WeatherMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidEnvVar {
            var: "WEATHER_HTTP_PORT".to_string(),
            value: "eighty".to_string(),
        };
        assert!(err.to_string().contains("WEATHER_HTTP_PORT"));
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::InvalidAddress {
            address: "nowhere:0".to_string(),
        };
        let err: WeatherMcpError = config_err.into();
        assert!(matches!(err, WeatherMcpError::Config(_)));
    }
}
