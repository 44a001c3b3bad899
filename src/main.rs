//! Weather MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server exposing current temperatures for a
//! fixed set of cities. Runs on stdio by default; `serve` starts the REST variant.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use weather_mcp_server::config::Config;
use weather_mcp_server::error::Result;
use weather_mcp_server::http;
use weather_mcp_server::mcp::server::McpServer;
use weather_mcp_server::weather::{CityRegistry, WeatherClient, WeatherLookup};

/// Weather MCP Server
#[derive(Parser)]
#[command(name = "weather-mcp-server")]
#[command(author, version, about = "Weather MCP Server - current temperatures over MCP stdio or REST")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API instead of MCP over stdio
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for protocol messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::new()?;

    let cities = Arc::new(CityRegistry::default());
    let lookup: Arc<dyn WeatherLookup> = Arc::new(WeatherClient::new(&config, cities)?);

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.http_host = host;
            }
            if let Some(port) = port {
                config.http_port = port;
            }
            http::serve(config.http_addr()?, lookup).await?;
        }
        None => {
            let server = McpServer::new(lookup);
            server.run_stdio().await?;
        }
    }

    Ok(())
}
