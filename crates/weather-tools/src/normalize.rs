//! Response normalizers: provider JSON in, stable schema out.
//!
//! One pure projection per operation. Every function is total: an absent
//! upstream field becomes JSON `null` in the output, never a panic and never
//! a made-up default (defaults belong to the operation layer). Input order is
//! preserved wherever the upstream returns a sequence.

use serde_json::{Value, json};

fn field(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or(Value::Null)
}

/// Current conditions. `is_day` comes back from the provider as `1`/`0` and
/// is mapped to a boolean here.
pub fn current(raw: &Value) -> Value {
    let location = field(raw, "location");
    let current = field(raw, "current");
    let condition = field(&current, "condition");

    json!({
        "location": {
            "name": field(&location, "name"),
            "region": field(&location, "region"),
            "country": field(&location, "country"),
            "coordinates": {
                "latitude": field(&location, "lat"),
                "longitude": field(&location, "lon"),
            },
            "timezone": field(&location, "tz_id"),
            "local_time": field(&location, "localtime"),
        },
        "current_weather": {
            "temperature": {
                "celsius": field(&current, "temp_c"),
                "fahrenheit": field(&current, "temp_f"),
                "feels_like_c": field(&current, "feelslike_c"),
                "feels_like_f": field(&current, "feelslike_f"),
            },
            "condition": {
                "text": field(&condition, "text"),
                "icon": field(&condition, "icon"),
                "code": field(&condition, "code"),
            },
            "wind": {
                "speed_mph": field(&current, "wind_mph"),
                "speed_kph": field(&current, "wind_kph"),
                "direction": field(&current, "wind_dir"),
                "degree": field(&current, "wind_degree"),
                "gust_mph": field(&current, "gust_mph"),
                "gust_kph": field(&current, "gust_kph"),
            },
            "atmosphere": {
                "pressure_mb": field(&current, "pressure_mb"),
                "pressure_in": field(&current, "pressure_in"),
                "humidity": field(&current, "humidity"),
                "cloud_cover": field(&current, "cloud"),
                "visibility_km": field(&current, "vis_km"),
                "visibility_miles": field(&current, "vis_miles"),
                "uv_index": field(&current, "uv"),
            },
            "precipitation": {
                "mm": field(&current, "precip_mm"),
                "inches": field(&current, "precip_in"),
            },
            "is_day": current.get("is_day").and_then(Value::as_i64) == Some(1),
            "last_updated": field(&current, "last_updated"),
        },
        "air_quality": field(raw, "air_quality"),
    })
}

/// Forecast: full rename of the daily aggregates and hourly slices, day and
/// hour order exactly as supplied by the provider.
pub fn forecast(raw: &Value) -> Value {
    let location = field(raw, "location");
    let days: Vec<Value> = raw
        .get("forecast")
        .and_then(|f| f.get("forecastday"))
        .and_then(Value::as_array)
        .map(|days| days.iter().map(forecast_day).collect())
        .unwrap_or_default();

    json!({
        "location": {
            "name": field(&location, "name"),
            "region": field(&location, "region"),
            "country": field(&location, "country"),
            "coordinates": {
                "latitude": field(&location, "lat"),
                "longitude": field(&location, "lon"),
            },
        },
        "forecast": days,
    })
}

fn forecast_day(day: &Value) -> Value {
    let daily = field(day, "day");
    let hours: Vec<Value> = day
        .get("hour")
        .and_then(Value::as_array)
        .map(|hours| hours.iter().map(forecast_hour).collect())
        .unwrap_or_default();

    json!({
        "date": field(day, "date"),
        "day": {
            "max_temp_c": field(&daily, "maxtemp_c"),
            "max_temp_f": field(&daily, "maxtemp_f"),
            "min_temp_c": field(&daily, "mintemp_c"),
            "min_temp_f": field(&daily, "mintemp_f"),
            "avg_temp_c": field(&daily, "avgtemp_c"),
            "avg_temp_f": field(&daily, "avgtemp_f"),
            "condition": field(&daily, "condition"),
            "max_wind_mph": field(&daily, "maxwind_mph"),
            "max_wind_kph": field(&daily, "maxwind_kph"),
            "total_precip_mm": field(&daily, "totalprecip_mm"),
            "total_precip_in": field(&daily, "totalprecip_in"),
            "avg_humidity": field(&daily, "avghumidity"),
            "avg_visibility_km": field(&daily, "avgvis_km"),
            "avg_visibility_miles": field(&daily, "avgvis_miles"),
            "uv_index": field(&daily, "uv"),
        },
        "hourly": hours,
    })
}

fn forecast_hour(hour: &Value) -> Value {
    json!({
        "time": field(hour, "time"),
        "temp_c": field(hour, "temp_c"),
        "temp_f": field(hour, "temp_f"),
        "condition": field(hour, "condition"),
        "wind_mph": field(hour, "wind_mph"),
        "wind_kph": field(hour, "wind_kph"),
        "wind_dir": field(hour, "wind_dir"),
        "pressure_mb": field(hour, "pressure_mb"),
        "precip_mm": field(hour, "precip_mm"),
        "humidity": field(hour, "humidity"),
        "cloud": field(hour, "cloud"),
        "feelslike_c": field(hour, "feelslike_c"),
        "feelslike_f": field(hour, "feelslike_f"),
        "will_it_rain": field(hour, "will_it_rain"),
        "chance_of_rain": field(hour, "chance_of_rain"),
        "will_it_snow": field(hour, "will_it_snow"),
        "chance_of_snow": field(hour, "chance_of_snow"),
        "vis_km": field(hour, "vis_km"),
        "vis_miles": field(hour, "vis_miles"),
        "gust_mph": field(hour, "gust_mph"),
        "gust_kph": field(hour, "gust_kph"),
        "uv": field(hour, "uv"),
    })
}

/// History: location identity plus the provider's per-day array untouched.
/// Historical data keeps the provider's field names on purpose; only the
/// forecast path gets the full rename treatment.
pub fn history(raw: &Value) -> Value {
    let location = field(raw, "location");
    let days = raw
        .get("forecast")
        .and_then(|f| f.get("forecastday"))
        .cloned()
        .unwrap_or_else(|| json!([]));

    json!({
        "location": {
            "name": field(&location, "name"),
            "region": field(&location, "region"),
            "country": field(&location, "country"),
        },
        "historical_data": days,
    })
}

/// Location search: the provider answers with a top-level array.
pub fn search(raw: &Value) -> Value {
    let locations: Vec<Value> = raw
        .as_array()
        .map(|locations| {
            locations
                .iter()
                .map(|location| {
                    json!({
                        "id": field(location, "id"),
                        "name": field(location, "name"),
                        "region": field(location, "region"),
                        "country": field(location, "country"),
                        "lat": field(location, "lat"),
                        "lon": field(location, "lon"),
                        "url": field(location, "url"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({ "locations": locations })
}

/// Astronomy: flattens the provider's `astronomy.astro` nesting.
pub fn astronomy(raw: &Value) -> Value {
    let location = field(raw, "location");
    let astro = raw
        .get("astronomy")
        .map(|astronomy| field(astronomy, "astro"))
        .unwrap_or(Value::Null);

    json!({
        "location": {
            "name": field(&location, "name"),
            "region": field(&location, "region"),
            "country": field(&location, "country"),
        },
        "astronomy": {
            "sunrise": field(&astro, "sunrise"),
            "sunset": field(&astro, "sunset"),
            "moonrise": field(&astro, "moonrise"),
            "moonset": field(&astro, "moonset"),
            "moon_phase": field(&astro, "moon_phase"),
            "moon_illumination": field(&astro, "moon_illumination"),
        },
    })
}
