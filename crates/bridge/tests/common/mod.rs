use anyhow::Context as _;
use axum::Json;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::process::{Child, Command};
use std::time::Duration;

pub use skybridge_test_support::KillOnDrop;

/// Key the stub upstream accepts. Spawning the bridge with any other key (or
/// none) makes every operation fail, which is exactly what the negative tests
/// want.
pub const STUB_API_KEY: &str = "stub-key-123";

pub fn spawn_bridge(port: u16, base_url: &str, api_key: Option<&str>) -> anyhow::Result<Child> {
    let bin = env!("CARGO_BIN_EXE_skybridge-mcp-bridge");
    let mut cmd = Command::new(bin);
    cmd.arg("--host")
        .arg("127.0.0.1")
        .arg("--port")
        .arg(port.to_string())
        .arg("--base-url")
        .arg(base_url)
        .arg("--log-level")
        .arg("info")
        .env_remove("WEATHER_API_KEY");

    if let Some(key) = api_key {
        cmd.env("WEATHER_API_KEY", key);
    }

    cmd.spawn().context("spawn bridge")
}

pub async fn start_bridge(
    upstream_base_url: &str,
    api_key: Option<&str>,
) -> anyhow::Result<(String, KillOnDrop)> {
    let port = skybridge_test_support::pick_unused_port()?;
    let child = spawn_bridge(port, upstream_base_url, api_key)?;
    let child = KillOnDrop(child);

    let base_url = format!("http://127.0.0.1:{port}");
    skybridge_test_support::wait_http_ok(&format!("{base_url}/healthz"), Duration::from_secs(20))
        .await?;

    Ok((base_url, child))
}

/// In-process fake of the WeatherAPI.com v1 surface. Serves canned payloads
/// that echo the `q` parameter, rejects bad keys with 401 and the location
/// `Nowhere` with the provider's 400 shape.
pub struct StubUpstream {
    pub base_url: String,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

pub async fn start_weatherapi_stub() -> anyhow::Result<StubUpstream> {
    let app = axum::Router::new()
        .route("/current.json", get(current))
        .route("/forecast.json", get(forecast))
        .route("/history.json", get(history))
        .route("/search.json", get(search))
        .route("/astronomy.json", get(astronomy));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind stub")?;
    let addr = listener.local_addr().context("stub local_addr")?;
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });
    tokio::spawn(async move { server.await });

    Ok(StubUpstream {
        base_url: format!("http://{addr}"),
        _shutdown: shutdown_tx,
    })
}

fn gate(params: &HashMap<String, String>) -> Option<Response> {
    if params.get("key").map(String::as_str) != Some(STUB_API_KEY) {
        return Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": 2006, "message": "API key provided is invalid."}})),
            )
                .into_response(),
        );
    }
    match params.get("q").map(String::as_str) {
        None | Some("") => Some(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"code": 1003, "message": "Parameter q is missing."}})),
            )
                .into_response(),
        ),
        Some("Nowhere") => Some(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"code": 1006, "message": "No matching location found."}})),
            )
                .into_response(),
        ),
        Some(_) => None,
    }
}

fn location_block(q: &str) -> Value {
    json!({
        "name": q,
        "region": "Ile-de-France",
        "country": "France",
        "lat": 48.87,
        "lon": 2.33,
        "tz_id": "Europe/Paris",
        "localtime": "2026-08-22 14:05"
    })
}

fn current_block() -> Value {
    json!({
        "last_updated": "2026-08-22 14:00",
        "temp_c": 24.0, "temp_f": 75.2, "is_day": 1,
        "condition": {
            "text": "Sunny",
            "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png",
            "code": 1000
        },
        "wind_mph": 8.1, "wind_kph": 13.0, "wind_degree": 220, "wind_dir": "SW",
        "pressure_mb": 1015.0, "pressure_in": 29.97,
        "precip_mm": 0.0, "precip_in": 0.0,
        "humidity": 48, "cloud": 10,
        "feelslike_c": 25.1, "feelslike_f": 77.2,
        "vis_km": 10.0, "vis_miles": 6.0, "uv": 5.0,
        "gust_mph": 12.3, "gust_kph": 19.8
    })
}

async fn current(Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(rejection) = gate(&params) {
        return rejection;
    }
    let q = params.get("q").cloned().unwrap_or_default();

    let mut body = json!({
        "location": location_block(&q),
        "current": current_block(),
    });
    if params.get("aqi").map(String::as_str) == Some("yes") {
        body["air_quality"] = json!({"pm2_5": 4.2, "pm10": 7.9, "us-epa-index": 1});
    }

    Json(body).into_response()
}

async fn forecast(Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(rejection) = gate(&params) {
        return rejection;
    }
    let q = params.get("q").cloned().unwrap_or_default();
    let days: usize = params
        .get("days")
        .and_then(|days| days.parse().ok())
        .unwrap_or(1);

    let forecastday: Vec<Value> = (0..days)
        .map(|i| {
            let date = format!("2026-08-{:02}", 22 + i);
            json!({
                "date": date,
                "day": {
                    "maxtemp_c": 26.0 + i as f64, "maxtemp_f": 78.8 + i as f64,
                    "mintemp_c": 15.0, "mintemp_f": 59.0,
                    "avgtemp_c": 20.5, "avgtemp_f": 68.9,
                    "condition": {
                        "text": "Partly cloudy",
                        "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                        "code": 1003
                    },
                    "maxwind_mph": 11.0, "maxwind_kph": 17.7,
                    "totalprecip_mm": 0.4, "totalprecip_in": 0.02,
                    "avghumidity": 60, "avgvis_km": 9.8, "avgvis_miles": 6.0, "uv": 4.0
                },
                "hour": [
                    {"time": format!("2026-08-{:02} 00:00", 22 + i), "temp_c": 16.2,
                     "condition": {"text": "Clear", "code": 1000}},
                    {"time": format!("2026-08-{:02} 12:00", 22 + i), "temp_c": 24.8,
                     "condition": {"text": "Sunny", "code": 1000}}
                ]
            })
        })
        .collect();

    Json(json!({
        "location": location_block(&q),
        "current": current_block(),
        "forecast": {"forecastday": forecastday},
    }))
    .into_response()
}

async fn history(Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(rejection) = gate(&params) {
        return rejection;
    }
    let q = params.get("q").cloned().unwrap_or_default();

    let mut dates = vec![params.get("dt").cloned().unwrap_or_default()];
    if let Some(end) = params.get("end_dt") {
        dates.push(end.clone());
    }
    let forecastday: Vec<Value> = dates
        .iter()
        .map(|date| {
            json!({
                "date": date,
                "day": {
                    "maxtemp_c": 28.4, "mintemp_c": 17.0, "avgtemp_c": 22.1,
                    "totalprecip_mm": 1.2, "avghumidity": 63,
                    "condition": {"text": "Patchy rain nearby", "code": 1063}
                }
            })
        })
        .collect();

    Json(json!({
        "location": location_block(&q),
        "forecast": {"forecastday": forecastday},
    }))
    .into_response()
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(rejection) = gate(&params) {
        return rejection;
    }
    let q = params.get("q").cloned().unwrap_or_default();

    Json(json!([
        {
            "id": 2566581, "name": q, "region": "Ile-de-France", "country": "France",
            "lat": 48.87, "lon": 2.33, "url": "paris-ile-de-france-france"
        },
        {
            "id": 2657896, "name": format!("{q} 17"), "region": "Ile-de-France",
            "country": "France", "lat": 48.88, "lon": 2.32,
            "url": "paris-17-ile-de-france-france"
        }
    ]))
    .into_response()
}

async fn astronomy(Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(rejection) = gate(&params) {
        return rejection;
    }
    let q = params.get("q").cloned().unwrap_or_default();

    Json(json!({
        "location": location_block(&q),
        "astronomy": {
            "astro": {
                "sunrise": "06:52 AM", "sunset": "08:47 PM",
                "moonrise": "03:11 PM", "moonset": "11:26 PM",
                "moon_phase": "Waxing Gibbous", "moon_illumination": 64
            }
        }
    }))
    .into_response()
}
