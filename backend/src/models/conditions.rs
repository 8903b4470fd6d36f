//! Hourly samples and the averages derived from them.

use serde::{Deserialize, Serialize};

/// Provider variable name for boundary-layer height (m).
pub const BOUNDARY_LAYER_HEIGHT: &str = "boundary_layer_height";
/// Provider variable name for 10 m wind speed (km/h).
pub const WIND_SPEED_10M: &str = "wind_speed_10m";

/// One day of hourly readings for a single atmospheric variable.
///
/// Missing hours are `None`, never a sentinel number.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySampleSeries {
    pub variable: String,
    pub values: Vec<Option<f64>>,
}

impl HourlySampleSeries {
    pub fn new(variable: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            variable: variable.into(),
            values,
        }
    }

    /// Number of hourly slots, present or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterator over the readings that are present.
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    /// Number of readings that are present.
    pub fn valid_count(&self) -> usize {
        self.present().count()
    }
}

/// Daily mean conditions at the sampling point.
///
/// Only produced by a successful fetch; downstream stages take it by value
/// so they cannot run without it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AveragedConditions {
    pub blh_avg_m: f64,
    pub wind_speed_avg_kmh: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_skips_missing_hours() {
        let series = HourlySampleSeries::new(
            BOUNDARY_LAYER_HEIGHT,
            vec![Some(1000.0), None, Some(1200.0), None],
        );
        assert_eq!(series.len(), 4);
        assert_eq!(series.valid_count(), 2);
        assert_eq!(series.present().collect::<Vec<_>>(), vec![1000.0, 1200.0]);
    }
}
