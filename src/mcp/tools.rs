//! MCP Tool definitions and handlers
//!
//! Tools are registered once at startup. Each registration pairs a static
//! descriptor with the handler `call_tool` routes to by name.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::mcp::types::{CallToolResult, JsonRpcError, Tool};
use crate::weather::{CityRegistry, WeatherLookup};

pub const GET_TEMPERATURE: &str = "get_temperature";
pub const GET_ALL_TEMPERATURES: &str = "get_all_temperatures";

/// Body of a registered tool
#[async_trait]
pub trait ToolCall: Send + Sync {
    async fn call(&self, args: Value) -> Result<CallToolResult, JsonRpcError>;
}

struct RegisteredTool {
    descriptor: Tool,
    handler: Box<dyn ToolCall>,
}

/// Tool handler
#[derive(Default)]
pub struct ToolHandler {
    tools: Vec<RegisteredTool>,
}

impl ToolHandler {
    /// Create a tool handler with the weather tools registered
    pub fn new(lookup: Arc<dyn WeatherLookup>) -> Self {
        let get_temperature = tool_def(
            GET_TEMPERATURE,
            &get_temperature_description(lookup.cities()),
            get_temperature_schema(lookup.cities()),
        );
        let get_all = tool_def(
            GET_ALL_TEMPERATURES,
            "Get current temperature for all supported cities",
            json!({"type": "object", "properties": {}}),
        );

        let mut handler = Self::default();
        handler.register(
            get_temperature,
            GetTemperature {
                lookup: Arc::clone(&lookup),
            },
        );
        handler.register(get_all, GetAllTemperatures { lookup });
        handler
    }

    /// Register a tool, replacing any earlier registration with the same name
    pub fn register(&mut self, descriptor: Tool, handler: impl ToolCall + 'static) {
        let entry = RegisteredTool {
            descriptor,
            handler: Box::new(handler),
        };
        match self
            .tools
            .iter_mut()
            .find(|t| t.descriptor.name == entry.descriptor.name)
        {
            Some(existing) => *existing = entry,
            None => self.tools.push(entry),
        }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<CallToolResult, JsonRpcError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.descriptor.name == name)
            .ok_or_else(|| JsonRpcError::tool_not_found(name))?;

        tool.handler.call(args).await
    }
}

// ==================== Tool Handlers ====================

/// Current temperature for one city
pub struct GetTemperature {
    lookup: Arc<dyn WeatherLookup>,
}

#[async_trait]
impl ToolCall for GetTemperature {
    async fn call(&self, args: Value) -> Result<CallToolResult, JsonRpcError> {
        let city = args
            .get("city")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::internal_error("get_temperature requires a string 'city' argument"))?;

        let report = self.lookup.lookup(city).await;
        if let Some(error) = report.error() {
            tracing::info!("Lookup for {} returned an error payload: {}", city, error);
        }

        text_result(&report)
    }
}

/// Current temperature for every registered city, keyed in registry order
pub struct GetAllTemperatures {
    lookup: Arc<dyn WeatherLookup>,
}

#[async_trait]
impl ToolCall for GetAllTemperatures {
    async fn call(&self, _args: Value) -> Result<CallToolResult, JsonRpcError> {
        let mut results = Map::new();

        for key in self.lookup.cities().keys() {
            let report = self.lookup.lookup(key).await;
            results.insert(key.to_string(), serde_json::to_value(report)?);
        }

        text_result(&results)
    }
}

/// Wrap a payload as 2-space indented JSON text content
fn text_result<T: serde::Serialize>(payload: &T) -> Result<CallToolResult, JsonRpcError> {
    Ok(CallToolResult::text(serde_json::to_string_pretty(payload)?))
}

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn display_list(cities: &CityRegistry) -> String {
    let names: Vec<String> = cities
        .keys()
        .map(crate::weather::cities::display_name)
        .collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn get_temperature_description(cities: &CityRegistry) -> String {
    format!("Get current temperature for a city ({})", display_list(cities))
}

fn get_temperature_schema(cities: &CityRegistry) -> Value {
    let keys: Vec<&str> = cities.keys().collect();
    json!({
        "type": "object",
        "properties": {
            "city": {
                "type": "string",
                "description": format!("City name ({})", display_list(cities).to_lowercase()),
                "enum": keys
            }
        },
        "required": ["city"]
    })
}
