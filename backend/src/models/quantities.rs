use qtty::{Hours, Seconds};

use crate::units;

/// Physical quantities derived for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedQuantities {
    /// Mixed air volume over the basin (m³).
    pub volume_m3: f64,
    /// Time for the prevailing wind to flush the basin.
    pub residence_time: Seconds,
    /// Permissible emission rate (µg/s).
    pub emission_cap_ug_s: f64,
    /// Permissible emission rate (tons/day).
    pub emission_cap_tons_day: f64,
}

impl DerivedQuantities {
    pub fn residence_time_s(&self) -> f64 {
        self.residence_time.value()
    }

    pub fn residence_time_hours(&self) -> Hours {
        units::seconds_to_hours(self.residence_time)
    }
}
