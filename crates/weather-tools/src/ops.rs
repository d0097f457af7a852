//! The operation set: argument validation, upstream query assembly and the
//! MCP tool catalog for the five weather capabilities.

use crate::client::WeatherApiClient;
use crate::error::{Result, WeatherToolsError};
use crate::normalize;
use chrono::Local;
use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};
use std::sync::Arc;

/// Config for a tool source. The API key is optional so that a keyless
/// process can still boot; every operation then fails with a `Config` error.
#[derive(Debug, Clone)]
pub struct WeatherToolsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// The five weather operations. Adding a variant forces every `match` below
/// to be extended, so the catalog, query assembly and normalizer dispatch
/// cannot drift apart silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherOp {
    CurrentWeather,
    WeatherForecast,
    WeatherHistory,
    SearchLocations,
    AstronomyData,
}

impl WeatherOp {
    pub const ALL: [Self; 5] = [
        Self::CurrentWeather,
        Self::WeatherForecast,
        Self::WeatherHistory,
        Self::SearchLocations,
        Self::AstronomyData,
    ];

    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::CurrentWeather => "get_current_weather",
            Self::WeatherForecast => "get_weather_forecast",
            Self::WeatherHistory => "get_weather_history",
            Self::SearchLocations => "search_locations",
            Self::AstronomyData => "get_astronomy_data",
        }
    }

    #[must_use]
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tool_name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            Self::CurrentWeather => "Get current weather conditions for a location",
            Self::WeatherForecast => "Get weather forecast for a location",
            Self::WeatherHistory => "Get historical weather data for a location",
            Self::SearchLocations => "Search for locations by name",
            Self::AstronomyData => {
                "Get astronomy data (sunrise, sunset, moon phase) for a location"
            }
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Self::CurrentWeather => "current.json",
            Self::WeatherForecast => "forecast.json",
            Self::WeatherHistory => "history.json",
            Self::SearchLocations => "search.json",
            Self::AstronomyData => "astronomy.json",
        }
    }

    fn input_schema(self) -> Value {
        let location = json!({
            "type": "string",
            "description": "City name, coordinates (lat,lon), or postal code"
        });
        let air_quality = json!({
            "type": "boolean",
            "description": "Include air quality data",
            "default": false
        });

        match self {
            Self::CurrentWeather => json!({
                "type": "object",
                "properties": {
                    "location": location,
                    "include_air_quality": air_quality,
                },
                "required": ["location"]
            }),
            Self::WeatherForecast => json!({
                "type": "object",
                "properties": {
                    "location": location,
                    "days": {
                        "type": "integer",
                        "description": "Number of forecast days (1-10)",
                        "default": 3,
                        "minimum": 1,
                        "maximum": 10
                    },
                    "include_air_quality": air_quality,
                },
                "required": ["location"]
            }),
            Self::WeatherHistory => json!({
                "type": "object",
                "properties": {
                    "location": location,
                    "date": {
                        "type": "string",
                        "description": "Date in YYYY-MM-DD format"
                    },
                    "end_date": {
                        "type": "string",
                        "description": "End date in YYYY-MM-DD format (optional)"
                    },
                },
                "required": ["location", "date"]
            }),
            Self::SearchLocations => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Location name to search for"
                    },
                },
                "required": ["query"]
            }),
            Self::AstronomyData => json!({
                "type": "object",
                "properties": {
                    "location": location,
                    "date": {
                        "type": "string",
                        "description": "Date in YYYY-MM-DD format (optional, defaults to today)"
                    },
                },
                "required": ["location"]
            }),
        }
    }
}

/// Tool source shared by both protocol adapters.
///
/// Built once at startup and passed around by `Arc`; everything inside is
/// read-only for the life of the process.
#[derive(Clone)]
pub struct WeatherToolSource {
    inner: Arc<WeatherToolSourceInner>,
}

struct WeatherToolSourceInner {
    client: WeatherApiClient,
    tools: Vec<Tool>,
}

impl WeatherToolSource {
    /// # Errors
    ///
    /// Returns `WeatherToolsError::Config` if the base URL is invalid or the
    /// HTTP client cannot be built. A missing API key is *not* an error here;
    /// it only fails individual calls.
    pub fn new(config: &WeatherToolsConfig) -> Result<Self> {
        let client = WeatherApiClient::new(config.base_url.clone(), config.api_key.clone())?;

        Ok(Self {
            inner: Arc::new(WeatherToolSourceInner {
                client,
                tools: tool_catalog(),
            }),
        })
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.inner.client.has_api_key()
    }

    /// The static declarative catalog exposed over `tools/list`.
    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        self.inner.tools.clone()
    }

    /// Run one operation: validate `args`, call the provider, normalize.
    ///
    /// # Errors
    ///
    /// `Validation` for arguments outside the declared schema, `Config` when
    /// no API key is set, `UpstreamStatus`/`UpstreamTransport` from the
    /// provider call. Upstream errors propagate unchanged; there is no
    /// operation-level recovery.
    pub async fn call(&self, op: WeatherOp, args: &Value) -> Result<Value> {
        let params = build_query(op, args)?;
        let raw = self.inner.client.fetch(op.endpoint(), &params).await?;

        Ok(match op {
            WeatherOp::CurrentWeather => normalize::current(&raw),
            WeatherOp::WeatherForecast => normalize::forecast(&raw),
            WeatherOp::WeatherHistory => normalize::history(&raw),
            WeatherOp::SearchLocations => normalize::search(&raw),
            WeatherOp::AstronomyData => normalize::astronomy(&raw),
        })
    }
}

fn tool_catalog() -> Vec<Tool> {
    WeatherOp::ALL
        .into_iter()
        .map(|op| {
            let schema_obj = op
                .input_schema()
                .as_object()
                .cloned()
                .unwrap_or_else(JsonObject::new);
            let mut tool = Tool::new(op.tool_name(), op.description(), Arc::new(schema_obj));
            tool.annotations = Some(lookup_annotations());
            tool
        })
        .collect()
}

// Every operation is a GET lookup against an external system.
fn lookup_annotations() -> ToolAnnotations {
    ToolAnnotations {
        title: None,
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}

/// Deterministic query assembly from validated arguments. Pure; the provider
/// matches parameters by name, so order carries no meaning.
fn build_query(op: WeatherOp, args: &Value) -> Result<Vec<(&'static str, String)>> {
    match op {
        WeatherOp::CurrentWeather => {
            let location = require_str(args, "location")?;
            let mut params = vec![("q", location.to_string())];
            if optional_bool(args, "include_air_quality")? {
                params.push(("aqi", "yes".to_string()));
            }
            Ok(params)
        }
        WeatherOp::WeatherForecast => {
            let location = require_str(args, "location")?;
            let days = forecast_days(args)?;
            let mut params = vec![("q", location.to_string()), ("days", days.to_string())];
            if optional_bool(args, "include_air_quality")? {
                params.push(("aqi", "yes".to_string()));
            }
            Ok(params)
        }
        WeatherOp::WeatherHistory => {
            let location = require_str(args, "location")?;
            let date = require_str(args, "date")?;
            let mut params = vec![("q", location.to_string()), ("dt", date.to_string())];
            if let Some(end_date) = optional_str(args, "end_date")?.filter(|d| !d.is_empty()) {
                params.push(("end_dt", end_date.to_string()));
            }
            Ok(params)
        }
        WeatherOp::SearchLocations => {
            let query = require_str(args, "query")?;
            Ok(vec![("q", query.to_string())])
        }
        WeatherOp::AstronomyData => {
            let location = require_str(args, "location")?;
            // Default date is computed here, per call, so a long-lived
            // process keeps tracking the calendar.
            let date = match optional_str(args, "date")? {
                Some(date) => date.to_string(),
                None => Local::now().format("%Y-%m-%d").to_string(),
            };
            Ok(vec![("q", location.to_string()), ("dt", date)])
        }
    }
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key).and_then(Value::as_str).ok_or_else(|| {
        WeatherToolsError::Validation(format!("'{key}' is required and must be a string"))
    })
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(WeatherToolsError::Validation(format!(
            "'{key}' must be a string"
        ))),
    }
}

fn optional_bool(args: &Value, key: &str) -> Result<bool> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(WeatherToolsError::Validation(format!(
            "'{key}' must be a boolean"
        ))),
    }
}

fn forecast_days(args: &Value) -> Result<i64> {
    match args.get("days") {
        None | Some(Value::Null) => Ok(3),
        Some(value) => {
            let days = value.as_i64().ok_or_else(|| {
                WeatherToolsError::Validation("'days' must be an integer".to_string())
            })?;
            if !(1..=10).contains(&days) {
                return Err(WeatherToolsError::Validation(format!(
                    "'days' must be between 1 and 10, got {days}"
                )));
            }
            Ok(days)
        }
    }
}
