//! Open-Meteo forecast client.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;

use super::error::{SamplerError, SamplerResult};
use super::{ForecastRequest, ForecastSource, HourlyForecast};
use crate::models::{HourlySampleSeries, BOUNDARY_LAYER_HEIGHT, WIND_SPEED_10M};

/// Public forecast endpoint.
pub const DEFAULT_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Applied when the configuration does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    boundary_layer_height: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
}

/// HTTP client for the Open-Meteo `/v1/forecast` endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    api_url: String,
}

impl OpenMeteoClient {
    /// Build a client for `api_url` whose requests give up after `timeout`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> SamplerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SamplerError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Query parameters for `request`.
    pub fn query_params(request: &ForecastRequest) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", request.coordinates.latitude.to_string()),
            ("longitude", request.coordinates.longitude.to_string()),
            ("hourly", format!("{},{}", BOUNDARY_LAYER_HEIGHT, WIND_SPEED_10M)),
            ("forecast_days", request.forecast_days.to_string()),
            ("timezone", request.timezone.clone()),
        ]
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn hourly_forecast(&self, request: &ForecastRequest) -> SamplerResult<HourlyForecast> {
        debug!(
            "Requesting hourly forecast from {} for ({}, {}) on {}",
            self.api_url, request.coordinates.latitude, request.coordinates.longitude, request.day
        );

        let response = self
            .client
            .get(&self.api_url)
            .query(&Self::query_params(request))
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SamplerError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(SamplerError::HttpStatus {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let forecast = parse_forecast_body(&body)?;
        if forecast.boundary_layer_height.len() != request.expected_hours() {
            warn!(
                "Provider returned {} hourly slots, expected {}",
                forecast.boundary_layer_height.len(),
                request.expected_hours()
            );
        }
        Ok(forecast)
    }
}

/// Decode a forecast response body.
///
/// Null entries become missing readings. The two hourly arrays must be
/// present, non-empty and of equal length.
pub fn parse_forecast_body(body: &str) -> SamplerResult<HourlyForecast> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| SamplerError::MalformedResponse(format!("Failed to parse forecast: {}", e)))?;

    let hourly = response.hourly;
    if hourly.boundary_layer_height.is_empty() || hourly.wind_speed_10m.is_empty() {
        return Err(SamplerError::MalformedResponse(
            "hourly arrays are empty".to_string(),
        ));
    }
    if hourly.boundary_layer_height.len() != hourly.wind_speed_10m.len() {
        return Err(SamplerError::MalformedResponse(format!(
            "hourly arrays differ in length ({} {} vs {} {})",
            hourly.boundary_layer_height.len(),
            BOUNDARY_LAYER_HEIGHT,
            hourly.wind_speed_10m.len(),
            WIND_SPEED_10M
        )));
    }

    Ok(HourlyForecast {
        boundary_layer_height: HourlySampleSeries::new(
            BOUNDARY_LAYER_HEIGHT,
            hourly.boundary_layer_height,
        ),
        wind_speed_10m: HourlySampleSeries::new(WIND_SPEED_10M, hourly.wind_speed_10m),
    })
}
