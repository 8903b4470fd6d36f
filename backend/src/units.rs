//! Unit conversions used by the box model.
//!
//! Lengths and durations go through [`qtty`] typed quantities so the
//! kilometre/metre and second/hour conversions are checked at compile time.
//! Two conversions are fixed published factors rather than exact SI ratios:
//! [`KMH_TO_MS`] and [`UG_PER_SEC_TO_TONS_PER_DAY`]. Results derived from them
//! must match those factors, so they are applied as plain multiplications.

use qtty::{Hour, Hours, Kilometers, Meter, Meters, Seconds};

/// km/h → m/s, four-decimal factor.
pub const KMH_TO_MS: f64 = 0.2778;

/// µg/s → metric tons/day (86 400 s/day × 1e-12 t/µg).
pub const UG_PER_SEC_TO_TONS_PER_DAY: f64 = 8.64e-8;

/// Square metres in one square kilometre.
pub const M2_PER_KM2: f64 = 1_000_000.0;

/// Convert a wind speed from km/h to m/s.
#[inline]
pub fn kmh_to_ms(speed_kmh: f64) -> f64 {
    speed_kmh * KMH_TO_MS
}

/// Convert a mass flux in µg/s to tons/day.
#[inline]
pub fn ug_per_sec_to_tons_per_day(flux_ug_s: f64) -> f64 {
    flux_ug_s * UG_PER_SEC_TO_TONS_PER_DAY
}

/// Convert an area from km² to m².
#[inline]
pub fn km2_to_m2(area_km2: f64) -> f64 {
    area_km2 * M2_PER_KM2
}

/// Convert a length in kilometres to metres.
#[inline]
pub fn km_to_m(length: Kilometers) -> Meters {
    length.to::<Meter>()
}

/// Convert a duration in seconds to hours.
#[inline]
pub fn seconds_to_hours(duration: Seconds) -> Hours {
    duration.to::<Hour>()
}

/// Round `value` to `decimals` places, half away from zero.
///
/// Only used when values leave the process (snapshot, history, console);
/// computations always carry full precision.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kmh_to_ms_uses_fixed_factor() {
        assert_abs_diff_eq!(kmh_to_ms(10.0), 2.778, epsilon = 1e-12);
        assert_eq!(kmh_to_ms(0.0), 0.0);
    }

    #[test]
    fn test_ug_per_sec_to_tons_per_day() {
        // 1e12 µg = 1 t; one µg/s for a day is 86 400 µg
        assert_abs_diff_eq!(ug_per_sec_to_tons_per_day(1e12 / 86_400.0), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_basin_geometry_conversions() {
        assert_eq!(km2_to_m2(1500.0), 1.5e9);
        assert_eq!(km_to_m(Kilometers::new(80.0)).value(), 80_000.0);
    }

    #[test]
    fn test_seconds_to_hours() {
        assert_abs_diff_eq!(
            seconds_to_hours(Seconds::new(28_800.0)).value(),
            8.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1100.04, 1), 1100.0);
        assert_eq!(round_to(10.005_1, 2), 10.01);
        assert_eq!(round_to(28_798.4, 0), 28_798.0);
        assert_eq!(round_to(-2.25, 1), -2.3);
    }
}
