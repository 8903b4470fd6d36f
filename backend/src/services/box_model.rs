//! Steady-state box model.
//!
//! Q = C·V / τ, with V = A·h (basin area × boundary-layer height) and
//! τ = L / u (basin length ÷ mean wind speed).

use qtty::Seconds;

use crate::models::{AveragedConditions, DerivedQuantities, GeographicConstants};
use crate::units;

/// Result type for box-model derivations
pub type BoxModelResult<T> = Result<T, BoxModelError>;

/// Inputs for which the box model has no meaningful answer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoxModelError {
    #[error("Residence time is undefined for a mean wind speed of {wind_speed_kmh} km/h")]
    DegenerateResidenceTime { wind_speed_kmh: f64 },

    #[error("Boundary-layer height must be finite and positive, got {blh_m} m")]
    InvalidBoundaryLayer { blh_m: f64 },

    #[error("Emission cap is not a finite number ({emission_cap_ug_s} µg/s)")]
    NonFiniteCap { emission_cap_ug_s: f64 },
}

/// Mixed air volume over the basin (m³).
///
/// The height must be positive and the product must stay finite.
pub fn volume(constants: &GeographicConstants, blh_avg_m: f64) -> BoxModelResult<f64> {
    if !blh_avg_m.is_finite() || blh_avg_m <= 0.0 {
        return Err(BoxModelError::InvalidBoundaryLayer { blh_m: blh_avg_m });
    }
    let volume_m3 = constants.basin_area_m2() * blh_avg_m;
    if !volume_m3.is_finite() {
        return Err(BoxModelError::InvalidBoundaryLayer { blh_m: blh_avg_m });
    }
    Ok(volume_m3)
}

/// Time the mean wind takes to cross the basin.
///
/// A zero, negative or non-finite wind speed is rejected, and so is a
/// positive one so small that the quotient overflows.
pub fn residence_time(
    constants: &GeographicConstants,
    wind_speed_avg_kmh: f64,
) -> BoxModelResult<Seconds> {
    let degenerate = || BoxModelError::DegenerateResidenceTime {
        wind_speed_kmh: wind_speed_avg_kmh,
    };
    let wind_speed_ms = units::kmh_to_ms(wind_speed_avg_kmh);
    if !wind_speed_ms.is_finite() || wind_speed_ms <= 0.0 {
        return Err(degenerate());
    }

    let residence_s = constants.basin_length_m().value() / wind_speed_ms;
    if !residence_s.is_finite() {
        return Err(degenerate());
    }
    Ok(Seconds::new(residence_s))
}

/// Permissible emission rate (µg/s) for the target concentration.
pub fn emission_cap(constants: &GeographicConstants, volume_m3: f64, residence: Seconds) -> f64 {
    constants.target_concentration_ug_m3 * volume_m3 / residence.value()
}

/// Run all three derivations for one set of averaged conditions.
pub fn derive(
    constants: &GeographicConstants,
    conditions: &AveragedConditions,
) -> BoxModelResult<DerivedQuantities> {
    let volume_m3 = volume(constants, conditions.blh_avg_m)?;
    let residence_time = residence_time(constants, conditions.wind_speed_avg_kmh)?;
    let emission_cap_ug_s = emission_cap(constants, volume_m3, residence_time);
    let emission_cap_tons_day = units::ug_per_sec_to_tons_per_day(emission_cap_ug_s);
    if !emission_cap_ug_s.is_finite() || !emission_cap_tons_day.is_finite() {
        return Err(BoxModelError::NonFiniteCap { emission_cap_ug_s });
    }

    Ok(DerivedQuantities {
        volume_m3,
        residence_time,
        emission_cap_ug_s,
        emission_cap_tons_day,
    })
}
