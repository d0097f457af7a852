//! WeatherAPI.com tool runtime.
//!
//! This crate holds everything protocol-independent:
//! - the upstream HTTP client (`client`)
//! - per-operation response normalizers (`normalize`)
//! - the operation set + MCP tool catalog (`ops`)
//!
//! Both the REST and the MCP adapter in `skybridge-mcp-bridge` sit on top of
//! this crate; it intentionally contains **no** axum routes and **no**
//! transport wiring.

pub mod client;
pub mod error;
pub mod normalize;
pub mod ops;

pub use client::{DEFAULT_BASE_URL, WeatherApiClient};
pub use error::{Result, WeatherToolsError};
pub use ops::{WeatherOp, WeatherToolSource, WeatherToolsConfig};
