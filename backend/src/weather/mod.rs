//! Hourly forecast retrieval.
//!
//! The rest of the crate only sees the [`ForecastSource`] trait. The
//! production implementation is [`open_meteo::OpenMeteoClient`]; tests plug in
//! [`StaticForecastSource`].

pub mod error;
pub mod open_meteo;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Coordinates, HourlySampleSeries};

pub use error::{SamplerError, SamplerResult};
pub use open_meteo::OpenMeteoClient;

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub coordinates: Coordinates,
    /// Local day the run is computed for.
    pub day: NaiveDate,
    pub forecast_days: u32,
    pub timezone: String,
}

impl ForecastRequest {
    /// Hourly slots the provider is expected to return.
    pub fn expected_hours(&self) -> usize {
        self.forecast_days as usize * 24
    }
}

/// Raw hourly series for the two variables the box model needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecast {
    pub boundary_layer_height: HourlySampleSeries,
    pub wind_speed_10m: HourlySampleSeries,
}

/// Source of hourly atmospheric forecasts.
///
/// Implementations must be `Send + Sync`.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the hourly boundary-layer height (m) and 10 m wind speed (km/h)
    /// series for `request`.
    async fn hourly_forecast(&self, request: &ForecastRequest) -> SamplerResult<HourlyForecast>;
}

/// Forecast source that always answers with the same series, or the same
/// error message.
#[derive(Debug, Clone)]
pub struct StaticForecastSource {
    response: Result<HourlyForecast, String>,
}

impl StaticForecastSource {
    pub fn new(forecast: HourlyForecast) -> Self {
        Self {
            response: Ok(forecast),
        }
    }

    /// Build a source from plain hourly vectors.
    pub fn from_values(blh: Vec<Option<f64>>, wind_kmh: Vec<Option<f64>>) -> Self {
        Self::new(HourlyForecast {
            boundary_layer_height: HourlySampleSeries::new(
                crate::models::BOUNDARY_LAYER_HEIGHT,
                blh,
            ),
            wind_speed_10m: HourlySampleSeries::new(crate::models::WIND_SPEED_10M, wind_kmh),
        })
    }

    /// A source whose every call fails at the transport layer.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
        }
    }
}

#[async_trait]
impl ForecastSource for StaticForecastSource {
    async fn hourly_forecast(&self, _request: &ForecastRequest) -> SamplerResult<HourlyForecast> {
        self.response
            .clone()
            .map_err(SamplerError::Transport)
    }
}
