use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::ForecastError,
    model::{Destination, HourlySeries},
};

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Source of hourly forecasts for a destination.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn hourly_forecast(
        &self,
        destination: &Destination,
    ) -> Result<HourlySeries, ForecastError>;
}
