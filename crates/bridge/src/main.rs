mod http_api;
mod mcp_server;

use anyhow::Context;
use clap::Parser;
use skybridge_weather_tools::{DEFAULT_BASE_URL, WeatherToolSource, WeatherToolsConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Expose WeatherAPI.com operations over streamable HTTP MCP and plain REST.
#[derive(Debug, Parser)]
#[command(name = "skybridge-mcp-bridge", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Upstream WeatherAPI.com base URL.
    #[arg(long, env = "WEATHER_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Log filter applied when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    // The key is read from the environment only, never from argv, so it cannot
    // show up in process listings.
    let api_key = std::env::var("WEATHER_API_KEY")
        .ok()
        .filter(|key| !key.is_empty());
    if api_key.is_none() {
        warn!(
            "WEATHER_API_KEY is not set; weather operations will answer 503 until it is configured"
        );
    }

    let source = WeatherToolSource::new(&WeatherToolsConfig {
        base_url: cli.base_url.clone(),
        api_key,
    })
    .context("building the weather tool source")?;

    let app = http_api::router(source.clone())
        .nest_service("/mcp", mcp_server::streamable_http_service(source));

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, base_url = %cli.base_url, "bridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }
}
