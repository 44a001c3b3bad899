//! REST variant of the weather service
//!
//! Serves the same lookups as the MCP tools over plain HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::weather::{WeatherLookup, WeatherReport};

const SERVICE_NAME: &str = "Weather MCP Server";

type SharedLookup = Arc<dyn WeatherLookup>;

/// Build the REST router
pub fn router(lookup: SharedLookup) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/temperature", get(temperature))
        .route("/all", get(all_temperatures))
        .with_state(lookup)
}

/// Bind `addr` and serve the REST API until the process is stopped
pub async fn serve(addr: SocketAddr, lookup: SharedLookup) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(lookup)).await?;
    Ok(())
}

async fn home(State(lookup): State<SharedLookup>) -> Json<Value> {
    let cities: Vec<&str> = lookup.cities().keys().collect();

    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/temperature": format!(
                "Get temperature for a city (query param: {})",
                cities.iter().map(|c| format!("city={}", c)).collect::<Vec<_>>().join(" or ")
            ),
            "/all": "Get temperatures for all supported cities"
        },
        "supported_cities": cities
    }))
}

#[derive(Debug, Deserialize)]
struct TemperatureQuery {
    city: Option<String>,
}

async fn temperature(
    State(lookup): State<SharedLookup>,
    Query(query): Query<TemperatureQuery>,
) -> Response {
    let city = match query.city.as_deref().map(str::trim) {
        Some(city) if !city.is_empty() => city.to_string(),
        _ => {
            let example = lookup
                .cities()
                .keys()
                .next()
                .map(|c| format!("/temperature?city={}", c))
                .unwrap_or_else(|| "/temperature?city=<name>".to_string());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing 'city' query parameter",
                    "example": example
                })),
            )
                .into_response();
        }
    };

    let report = lookup.lookup(&city).await;
    let status = match &report {
        WeatherReport::Current(_) => StatusCode::OK,
        WeatherReport::Failed { .. } if lookup.cities().get(&city).is_none() => StatusCode::NOT_FOUND,
        WeatherReport::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(report)).into_response()
}

async fn all_temperatures(State(lookup): State<SharedLookup>) -> Json<Value> {
    let mut cities = Map::new();

    for key in lookup.cities().keys() {
        let report = lookup.lookup(key).await;
        cities.insert(key.to_string(), json!(report));
    }

    Json(json!({
        "cities": cities,
        "count": lookup.cities().len()
    }))
}
