use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    config::{Config, ForecastConfig},
    error::ForecastError,
    model::{Destination, HourlySeries},
    transport::Transport,
};

use super::ForecastProvider;

/// Longest horizon Open-Meteo serves.
pub const MAX_FORECAST_DAYS: u8 = 16;

const DEFAULT_INTERVAL_SECS: i64 = 3600;

/// Hourly forecasts from <https://open-meteo.com>. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    config: ForecastConfig,
    include_condition: bool,
    transport: Transport,
}

impl OpenMeteoProvider {
    pub fn new(config: ForecastConfig, transport: Transport) -> Self {
        Self { config, include_condition: true, transport }
    }

    /// Whether to request `weather_code` alongside temperature.
    pub fn with_condition_codes(mut self, include: bool) -> Self {
        self.include_condition = include;
        self
    }

    /// Provider wired with the configured timeout, retry policy and cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.forecast.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let transport = Transport::new(http, config.retry.clone(), config.response_cache()?);

        Ok(Self::new(config.forecast.clone(), transport)
            .with_condition_codes(config.variant.includes_condition()))
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }

    fn query_params(&self, latitude: f64, longitude: f64) -> Vec<(String, String)> {
        let hourly = if self.include_condition {
            "temperature_2m,weather_code"
        } else {
            "temperature_2m"
        };
        let days = self.config.forecast_days.clamp(1, MAX_FORECAST_DAYS);

        [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", hourly.to_string()),
            ("forecast_days", days.to_string()),
            ("temperature_unit", self.config.temperature_unit.as_str().to_string()),
            ("wind_speed_unit", self.config.wind_speed_unit.clone()),
            ("precipitation_unit", self.config.precipitation_unit.clone()),
            ("timezone", self.config.timezone.clone()),
            ("timeformat", "unixtime".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidCoordinates { latitude, longitude });
        }
        Ok(())
    }

    /// Reshape an Open-Meteo JSON document into a `[start, end)` grid.
    pub fn parse_response(body: &str) -> Result<HourlySeries, ForecastError> {
        let parsed: OmResponse =
            serde_json::from_str(body).map_err(|e| ForecastError::Parse(e.to_string()))?;

        let hourly = parsed
            .hourly
            .ok_or_else(|| ForecastError::Parse("No hourly data in response".to_string()))?;

        let temperature = hourly
            .temperature_2m
            .ok_or_else(|| ForecastError::Parse("No temperature_2m in hourly data".to_string()))?;

        let start = match hourly.time.first() {
            Some(&ts) => unix_to_utc(ts)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        let interval_secs = match hourly.time.as_slice() {
            [first, second, ..] if second > first => second - first,
            _ => DEFAULT_INTERVAL_SECS,
        };
        let interval = Duration::try_seconds(interval_secs)
            .ok_or_else(|| ForecastError::Parse(format!("Invalid interval: {interval_secs}s")))?;

        let end = i32::try_from(hourly.time.len())
            .ok()
            .and_then(|steps| interval.checked_mul(steps))
            .and_then(|span| start.checked_add_signed(span))
            .ok_or_else(|| ForecastError::Parse("Hourly grid out of range".to_string()))?;

        let weather_code = hourly.weather_code.map(|codes| {
            codes
                .into_iter()
                .map(|c| c.filter(|v| v.is_finite()).map(|v| v.round() as i32))
                .collect()
        });

        Ok(HourlySeries {
            start,
            end,
            interval,
            utc_offset: Duration::seconds(i64::from(parsed.utc_offset_seconds)),
            temperature,
            weather_code,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    hourly: Option<OmHourly>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<i64>,
    temperature_2m: Option<Vec<Option<f64>>>,
    #[serde(default)]
    weather_code: Option<Vec<Option<f64>>>,
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    #[instrument(skip(self, destination), fields(city = %destination.name))]
    async fn hourly_forecast(
        &self,
        destination: &Destination,
    ) -> Result<HourlySeries, ForecastError> {
        Self::validate_coordinates(destination.latitude, destination.longitude)?;

        let params = self.query_params(destination.latitude, destination.longitude);
        let series = self
            .transport
            .get_decoded(&self.forecast_url(), &params, Self::parse_response)
            .await?;

        info!(hours = series.len(), start = %series.start, "Forecast received");
        Ok(series)
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, ForecastError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| ForecastError::Parse(format!("Timestamp out of range: {ts}")))
}
