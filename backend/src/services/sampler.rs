//! Atmospheric sampling: fetch one day of hourly data and reduce it to means.

use chrono::NaiveDate;
use log::{debug, info};

use crate::models::{AveragedConditions, Coordinates, HourlySampleSeries};
use crate::weather::{ForecastRequest, ForecastSource, SamplerError, SamplerResult};

/// Arithmetic mean of the readings that are present.
///
/// Missing hours are excluded, not counted as zero. Fails with
/// [`SamplerError::NoValidSamples`] when nothing is left.
pub fn mean_of_present(series: &HourlySampleSeries) -> SamplerResult<f64> {
    let (sum, count) = series
        .present()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return Err(SamplerError::NoValidSamples {
            variable: series.variable.clone(),
            total: series.len(),
        });
    }

    debug!(
        "{}: {} of {} hourly readings present",
        series.variable,
        count,
        series.len()
    );
    Ok(sum / count as f64)
}

/// Fetches and averages the conditions the box model runs on.
pub struct AtmosphericSampler<S: ForecastSource> {
    source: S,
    forecast_days: u32,
    timezone: String,
}

impl<S: ForecastSource> AtmosphericSampler<S> {
    pub fn new(source: S, forecast_days: u32, timezone: impl Into<String>) -> Self {
        Self {
            source,
            forecast_days,
            timezone: timezone.into(),
        }
    }

    /// Fetch hourly boundary-layer height and wind speed at `coordinates`
    /// for `day` and average each series independently.
    ///
    /// No retry: any transport, parse or empty-series failure is returned
    /// as is.
    pub async fn fetch(
        &self,
        coordinates: Coordinates,
        day: NaiveDate,
    ) -> SamplerResult<AveragedConditions> {
        let request = ForecastRequest {
            coordinates,
            day,
            forecast_days: self.forecast_days,
            timezone: self.timezone.clone(),
        };

        let forecast = self.source.hourly_forecast(&request).await?;
        let blh_avg_m = mean_of_present(&forecast.boundary_layer_height)?;
        let wind_speed_avg_kmh = mean_of_present(&forecast.wind_speed_10m)?;

        info!(
            "Averaged conditions for {}: BLH {:.1} m, wind {:.2} km/h",
            day, blh_avg_m, wind_speed_avg_kmh
        );

        Ok(AveragedConditions {
            blh_avg_m,
            wind_speed_avg_kmh,
        })
    }
}
