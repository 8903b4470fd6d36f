//! Single-run result document written next to the history file.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::conditions::AveragedConditions;
use super::constants::GeographicConstants;
use super::quantities::DerivedQuantities;
use crate::units::{self, round_to};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<FixedOffset>,
    pub constants: SnapshotConstants,
    pub atmospheric_conditions: SnapshotConditions,
    pub calculated_values: SnapshotCalculatedValues,
    pub result: SnapshotResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConstants {
    pub target_concentration_ug_m3: f64,
    pub basin_area_km2: f64,
    pub basin_length_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConditions {
    pub blh_avg_m: f64,
    pub wind_speed_avg_kmh: f64,
    pub wind_speed_avg_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCalculatedValues {
    /// Unrounded.
    pub volume_m3: f64,
    pub residence_time_seconds: f64,
    pub residence_time_hours: f64,
    pub emission_cap_ug_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResult {
    pub emission_cap_tons_day: f64,
}

impl Snapshot {
    /// Assemble the snapshot of one run, applying the display precision of
    /// each field.
    pub fn from_run(
        timestamp: DateTime<FixedOffset>,
        constants: &GeographicConstants,
        conditions: &AveragedConditions,
        derived: &DerivedQuantities,
    ) -> Self {
        Self {
            timestamp,
            constants: SnapshotConstants {
                target_concentration_ug_m3: constants.target_concentration_ug_m3,
                basin_area_km2: constants.basin_area_km2,
                basin_length_km: constants.basin_length.value(),
            },
            atmospheric_conditions: SnapshotConditions {
                blh_avg_m: round_to(conditions.blh_avg_m, 1),
                wind_speed_avg_kmh: round_to(conditions.wind_speed_avg_kmh, 2),
                wind_speed_avg_ms: round_to(units::kmh_to_ms(conditions.wind_speed_avg_kmh), 2),
            },
            calculated_values: SnapshotCalculatedValues {
                volume_m3: derived.volume_m3,
                residence_time_seconds: round_to(derived.residence_time_s(), 0),
                residence_time_hours: round_to(derived.residence_time_hours().value(), 1),
                emission_cap_ug_s: round_to(derived.emission_cap_ug_s, 0),
            },
            result: SnapshotResult {
                emission_cap_tons_day: round_to(derived.emission_cap_tons_day, 2),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_layout_and_precision() {
        let timestamp = DateTime::parse_from_rfc3339("2026-10-17T08:15:00+07:00").unwrap();
        let conditions = AveragedConditions {
            blh_avg_m: 1100.0,
            wind_speed_avg_kmh: 10.0,
        };
        let derived = DerivedQuantities {
            volume_m3: 1.65e12,
            residence_time: qtty::Seconds::new(28_797.696_184_305_25),
            emission_cap_ug_s: 2_148_609_375.4,
            emission_cap_tons_day: 185.639_850_034_56,
        };

        let snapshot = Snapshot::from_run(
            timestamp,
            &GeographicConstants::default(),
            &conditions,
            &derived,
        );
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["timestamp"], "2026-10-17T08:15:00+07:00");
        assert_eq!(json["constants"]["target_concentration_ug_m3"], 37.5);
        assert_eq!(json["constants"]["basin_area_km2"], 1500.0);
        assert_eq!(json["constants"]["basin_length_km"], 80.0);
        assert_eq!(json["atmospheric_conditions"]["blh_avg_m"], 1100.0);
        assert_eq!(json["atmospheric_conditions"]["wind_speed_avg_kmh"], 10.0);
        assert_eq!(json["atmospheric_conditions"]["wind_speed_avg_ms"], 2.78);
        assert_eq!(json["calculated_values"]["volume_m3"], 1.65e12);
        assert_eq!(json["calculated_values"]["residence_time_seconds"], 28_798.0);
        assert_eq!(json["calculated_values"]["residence_time_hours"], 8.0);
        assert_eq!(json["calculated_values"]["emission_cap_ug_s"], 2_148_609_375.0);
        assert_eq!(json["result"]["emission_cap_tons_day"], 185.64);
    }
}
