//! Fixed geographic description of the basin being modelled.

use qtty::{Kilometers, Meters};
use serde::{Deserialize, Serialize};

use crate::units;

/// A sampling point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Process-wide constants of the airshed basin.
///
/// Built once from configuration and only ever read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GeographicConstants {
    /// Target ambient concentration (µg/m³).
    pub target_concentration_ug_m3: f64,
    /// Basin surface area (km²).
    pub basin_area_km2: f64,
    /// Characteristic basin length along the prevailing wind.
    pub basin_length: Kilometers,
    /// Point at which atmospheric conditions are sampled.
    pub coordinates: Coordinates,
    /// IANA zone the provider should use for the hourly window.
    pub timezone: String,
}

impl GeographicConstants {
    /// Basin surface area in m².
    pub fn basin_area_m2(&self) -> f64 {
        units::km2_to_m2(self.basin_area_km2)
    }

    /// Basin length in metres.
    pub fn basin_length_m(&self) -> Meters {
        units::km_to_m(self.basin_length)
    }
}

impl Default for GeographicConstants {
    /// The Chiang Mai–Lamphun basin with the PM2.5 target of 37.5 µg/m³.
    fn default() -> Self {
        Self {
            target_concentration_ug_m3: 37.5,
            basin_area_km2: 1500.0,
            basin_length: Kilometers::new(80.0),
            coordinates: Coordinates::new(18.7883, 98.9853),
            timezone: "Asia/Bangkok".to_string(),
        }
    }
}
