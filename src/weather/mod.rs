//! Weather lookups for inline queries.

mod client;
mod format;

pub use client::{WeatherClient, WeatherError};
pub use format::{WeatherReport, build_report};
