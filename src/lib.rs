//! Weather MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing current-temperature tools
//! for a fixed set of cities, backed by the Open-Meteo API. A REST variant
//! serves the same lookups over HTTP.

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod weather;

pub use config::Config;
pub use error::{Result, WeatherMcpError};
