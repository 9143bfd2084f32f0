//! Sampled journey legs with scheduled and actual times.

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};

/// One leg of one sampled journey, labeled with the station pair that was
/// queried to obtain it.
///
/// The pair codes are already canonical on this side. An empty code marks the
/// record as malformed; the aggregator skips it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DelayObservation {
    #[serde(default)]
    pub start_station: String,
    #[serde(default)]
    pub end_station: String,
    #[serde(default)]
    pub journey: usize,
    #[serde(default)]
    pub leg_number: u32,
    #[serde(default)]
    pub train: Option<String>,

    #[serde(default, deserialize_with = "time_of_day")]
    pub departure_scheduled: Option<NaiveTime>,
    #[serde(default, deserialize_with = "time_of_day")]
    pub departure_actual: Option<NaiveTime>,
    #[serde(default, deserialize_with = "time_of_day")]
    pub arrival_scheduled: Option<NaiveTime>,
    #[serde(default, deserialize_with = "time_of_day")]
    pub arrival_actual: Option<NaiveTime>,

    #[serde(default)]
    pub departure_delay: Option<i64>,
    #[serde(default)]
    pub arrival_delay: Option<i64>,
}

impl DelayObservation {
    /// Returns the exact `(start, end)` pair, or `None` when either side is
    /// empty.
    pub fn station_pair(&self) -> Option<(&str, &str)> {
        if self.start_station.is_empty() || self.end_station.is_empty() {
            None
        } else {
            Some((self.start_station.as_str(), self.end_station.as_str()))
        }
    }

    /// Departure delay in minutes, falling back to actual - scheduled.
    pub fn departure_delay(&self) -> Option<i64> {
        self.departure_delay
            .or_else(|| minutes_late(self.departure_scheduled, self.departure_actual))
    }

    /// Arrival delay in minutes, falling back to actual - scheduled.
    pub fn arrival_delay(&self) -> Option<i64> {
        self.arrival_delay
            .or_else(|| minutes_late(self.arrival_scheduled, self.arrival_actual))
    }
}

/// Difference between two same-day times of day, in whole minutes.
///
/// Differences beyond half a day are taken to cross midnight.
pub fn minutes_late(scheduled: Option<NaiveTime>, actual: Option<NaiveTime>) -> Option<i64> {
    let (scheduled, actual) = (scheduled?, actual?);
    let half_day = TimeDelta::hours(12);
    let full_day = TimeDelta::hours(24);

    let mut diff = actual.signed_duration_since(scheduled);
    if diff > half_day {
        diff = diff - full_day;
    } else if diff < -half_day {
        diff = diff + full_day;
    }

    Some(diff.num_minutes())
}

/// Parses `HH:MM` or `HH:MM:SS`. Anything else is absent.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn time_of_day<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_time_of_day))
}
