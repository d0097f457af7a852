//! REST adapter: one route per weather operation, plus liveness and a root
//! descriptor.
//!
//! Every operation route accepts both GET with query parameters and POST with
//! a JSON body; both variants funnel into the same operation layer, so
//! validation and error mapping cannot diverge between them.

use axum::{
    Extension, Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use skybridge_weather_tools::{WeatherOp, WeatherToolSource, WeatherToolsError};
use tracing::warn;

pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

pub fn router(source: WeatherToolSource) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(root))
        .route(
            "/get_current_weather",
            get(current_weather_query).post(current_weather_json),
        )
        .route(
            "/get_weather_forecast",
            get(weather_forecast_query).post(weather_forecast_json),
        )
        .route(
            "/get_weather_history",
            get(weather_history_query).post(weather_history_json),
        )
        .route(
            "/search_locations",
            get(search_locations_query).post(search_locations_json),
        )
        .route(
            "/get_astronomy_data",
            get(astronomy_data_query).post(astronomy_data_json),
        )
        .layer(Extension(source))
}

/// Liveness. Never touches configuration or the upstream.
async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Root descriptor: reports whether an API key is configured without ever
/// echoing the key.
async fn root(Extension(source): Extension<WeatherToolSource>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "api_key_configured": source.has_api_key(),
        "mcp_endpoint": "/mcp",
    }))
}

#[derive(Debug, Serialize, Deserialize)]
struct CurrentWeatherParams {
    location: Option<String>,
    include_air_quality: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WeatherForecastParams {
    location: Option<String>,
    days: Option<i64>,
    include_air_quality: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WeatherHistoryParams {
    location: Option<String>,
    date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchLocationsParams {
    query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AstronomyDataParams {
    location: Option<String>,
    date: Option<String>,
}

async fn current_weather_query(
    Extension(source): Extension<WeatherToolSource>,
    Query(params): Query<CurrentWeatherParams>,
) -> Response {
    run_operation(&source, WeatherOp::CurrentWeather, &params).await
}

async fn current_weather_json(
    Extension(source): Extension<WeatherToolSource>,
    Json(params): Json<CurrentWeatherParams>,
) -> Response {
    run_operation(&source, WeatherOp::CurrentWeather, &params).await
}

async fn weather_forecast_query(
    Extension(source): Extension<WeatherToolSource>,
    Query(params): Query<WeatherForecastParams>,
) -> Response {
    run_operation(&source, WeatherOp::WeatherForecast, &params).await
}

async fn weather_forecast_json(
    Extension(source): Extension<WeatherToolSource>,
    Json(params): Json<WeatherForecastParams>,
) -> Response {
    run_operation(&source, WeatherOp::WeatherForecast, &params).await
}

async fn weather_history_query(
    Extension(source): Extension<WeatherToolSource>,
    Query(params): Query<WeatherHistoryParams>,
) -> Response {
    run_operation(&source, WeatherOp::WeatherHistory, &params).await
}

async fn weather_history_json(
    Extension(source): Extension<WeatherToolSource>,
    Json(params): Json<WeatherHistoryParams>,
) -> Response {
    run_operation(&source, WeatherOp::WeatherHistory, &params).await
}

async fn search_locations_query(
    Extension(source): Extension<WeatherToolSource>,
    Query(params): Query<SearchLocationsParams>,
) -> Response {
    run_operation(&source, WeatherOp::SearchLocations, &params).await
}

async fn search_locations_json(
    Extension(source): Extension<WeatherToolSource>,
    Json(params): Json<SearchLocationsParams>,
) -> Response {
    run_operation(&source, WeatherOp::SearchLocations, &params).await
}

async fn astronomy_data_query(
    Extension(source): Extension<WeatherToolSource>,
    Query(params): Query<AstronomyDataParams>,
) -> Response {
    run_operation(&source, WeatherOp::AstronomyData, &params).await
}

async fn astronomy_data_json(
    Extension(source): Extension<WeatherToolSource>,
    Json(params): Json<AstronomyDataParams>,
) -> Response {
    run_operation(&source, WeatherOp::AstronomyData, &params).await
}

async fn run_operation<P: Serialize>(
    source: &WeatherToolSource,
    op: WeatherOp,
    params: &P,
) -> Response {
    let args = match serde_json::to_value(params) {
        Ok(args) => args,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": e.to_string() })),
            )
                .into_response();
        }
    };

    match source.call(op, &args).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => error_response(op, &e),
    }
}

fn error_response(op: WeatherOp, err: &WeatherToolsError) -> Response {
    let status = match err {
        WeatherToolsError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        WeatherToolsError::UpstreamStatus { .. } | WeatherToolsError::UpstreamTransport(_) => {
            StatusCode::BAD_GATEWAY
        }
        WeatherToolsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    if status.is_server_error() {
        warn!(op = op.tool_name(), error = %err, "operation failed");
    }

    (status, Json(json!({ "detail": err.to_string() }))).into_response()
}
