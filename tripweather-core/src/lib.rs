//! Core library for the `tripweather` CLI.
//!
//! This crate defines:
//! - Itinerary loading and configuration
//! - The Open-Meteo forecast provider with its retrying, caching transport
//! - Per-day aggregation and WMO condition classification
//! - Ordering and rendering of the resulting day summaries
//!
//! It is used by `tripweather-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod cache;
pub mod condition;
pub mod config;
pub mod error;
pub mod itinerary;
pub mod model;
pub mod pipeline;
pub mod present;
pub mod provider;
pub mod retry;
pub mod transport;

pub use config::{Config, ForecastConfig, TemperatureUnit};
pub use error::ForecastError;
pub use itinerary::Itinerary;
pub use model::{DaySummary, Destination, HourlyReading, HourlySeries};
pub use pipeline::PipelineError;
pub use present::{ReportOptions, ReportVariant, SummaryRecord};
pub use provider::{ForecastProvider, OpenMeteoProvider};
