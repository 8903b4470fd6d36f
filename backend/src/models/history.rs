//! Day-keyed historical series of computed emission caps.
//!
//! The series is an ordered list with at most one entry per calendar date.
//! [`upsert`] is the only way a run changes it: an entry for a date already
//! present replaces that element in place, anything else is appended.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::conditions::AveragedConditions;
use super::quantities::DerivedQuantities;
use crate::units::round_to;

/// One day's recorded result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    /// Local calendar date of the computation; the identity key.
    pub date: NaiveDate,
    /// Instant of the computation.
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<FixedOffset>,
    pub emission_cap_tons_day: f64,
    pub blh_avg_m: f64,
    pub wind_speed_avg_kmh: f64,
    pub residence_time_hours: f64,
}

impl HistoricalEntry {
    /// Build the entry for a run computed at `timestamp`, rounding every
    /// value to its storage precision.
    pub fn from_run(
        timestamp: DateTime<FixedOffset>,
        conditions: &AveragedConditions,
        derived: &DerivedQuantities,
    ) -> Self {
        Self {
            date: timestamp.date_naive(),
            timestamp,
            emission_cap_tons_day: round_to(derived.emission_cap_tons_day, 2),
            blh_avg_m: round_to(conditions.blh_avg_m, 1),
            wind_speed_avg_kmh: round_to(conditions.wind_speed_avg_kmh, 2),
            residence_time_hours: round_to(derived.residence_time_hours().value(), 1),
        }
    }
}

/// Ordered entries, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalSeries(Vec<HistoricalEntry>);

impl HistoricalSeries {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn entries(&self) -> &[HistoricalEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of the first entry recorded for `date`.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.0.iter().position(|entry| entry.date == date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&HistoricalEntry> {
        self.position_of(date).map(|idx| &self.0[idx])
    }

    pub fn into_inner(self) -> Vec<HistoricalEntry> {
        self.0
    }
}

impl From<Vec<HistoricalEntry>> for HistoricalSeries {
    fn from(entries: Vec<HistoricalEntry>) -> Self {
        Self(entries)
    }
}

/// What [`upsert`] did with the candidate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No entry existed for the date; the candidate was appended at `index`.
    Inserted { index: usize },
    /// The entry at `index` had the same date and was replaced.
    Replaced { index: usize },
}

impl UpsertOutcome {
    pub fn index(&self) -> usize {
        match self {
            UpsertOutcome::Inserted { index } | UpsertOutcome::Replaced { index } => *index,
        }
    }
}

/// Insert `entry` into `series` keyed by its date.
///
/// Replaces the first element with the same date without moving it, or
/// appends at the end. Neighbouring entries are never touched.
pub fn upsert(
    series: HistoricalSeries,
    entry: HistoricalEntry,
) -> (HistoricalSeries, UpsertOutcome) {
    let mut entries = series.into_inner();
    let outcome = match entries.iter().position(|e| e.date == entry.date) {
        Some(index) => {
            entries[index] = entry;
            UpsertOutcome::Replaced { index }
        }
        None => {
            entries.push(entry);
            UpsertOutcome::Inserted {
                index: entries.len() - 1,
            }
        }
    };
    (HistoricalSeries(entries), outcome)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and, for files written by earlier tools, naive ISO-8601
/// local times without an offset (taken to be in the local zone).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.fixed_offset())
        .ok_or_else(|| format!("timestamp '{}' does not exist in the local time zone", raw))
}

mod timestamp_format {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
