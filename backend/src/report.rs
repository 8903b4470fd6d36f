//! Human-readable console report of a run.

use std::fmt::Write;

use crate::models::UpsertOutcome;
use crate::services::RunReport;
use crate::units;

const RULE_WIDTH: usize = 70;

/// Format `value` with `decimals` places and comma thousands separators.
pub fn with_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Render the full report printed after a successful run.
pub fn render(report: &RunReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let constants = &report.constants;
    let conditions = &report.conditions;
    let derived = &report.derived;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "Airshed Emission Cap Calculator");
    let _ = writeln!(out, "Steady-State Box Model");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "\nDate: {}",
        report.timestamp.format("%d/%m/%Y %H:%M:%S")
    );

    let _ = writeln!(out, "\nConstants:");
    let _ = writeln!(
        out,
        "  Target concentration (C): {} µg/m³",
        constants.target_concentration_ug_m3
    );
    let _ = writeln!(
        out,
        "  Basin area: {} km² ({} m²)",
        with_thousands(constants.basin_area_km2, 0),
        with_thousands(constants.basin_area_m2(), 0)
    );
    let _ = writeln!(
        out,
        "  Basin length: {} km ({} m)",
        constants.basin_length.value(),
        with_thousands(constants.basin_length_m().value(), 0)
    );

    let _ = writeln!(out, "\nAtmospheric conditions (24-hour average):");
    let _ = writeln!(
        out,
        "  Boundary-layer height (BLH): {:.1} m",
        conditions.blh_avg_m
    );
    let _ = writeln!(
        out,
        "  Wind speed: {:.2} km/h ({:.2} m/s)",
        conditions.wind_speed_avg_kmh,
        units::kmh_to_ms(conditions.wind_speed_avg_kmh)
    );

    let _ = writeln!(out, "\nCalculated values:");
    let _ = writeln!(out, "  Volume (V): {:.2e} m³", derived.volume_m3);
    let _ = writeln!(
        out,
        "  Residence time (τ): {} s ({:.1} h)",
        with_thousands(derived.residence_time_s(), 0),
        derived.residence_time_hours().value()
    );
    let _ = writeln!(
        out,
        "  Emission cap (Q): {} µg/s",
        with_thousands(derived.emission_cap_ug_s, 0)
    );

    let _ = writeln!(out, "\nResult:");
    let _ = writeln!(
        out,
        "  Daily emission cap: {:.2} tons/day",
        derived.emission_cap_tons_day
    );
    let _ = writeln!(out, "{}\n", rule);

    let _ = writeln!(out, "Snapshot saved to {}", report.snapshot_path.display());
    let action = match report.history_outcome {
        UpsertOutcome::Inserted { .. } => "Added new entry",
        UpsertOutcome::Replaced { .. } => "Updated existing entry",
    };
    let _ = writeln!(
        out,
        "{} for {} in {}",
        action, report.entry.date, report.history_location
    );
    out
}
