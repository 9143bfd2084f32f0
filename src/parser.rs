//! JSON decoding for route files and delay snapshot files.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::observation::{DelayObservation, parse_time_of_day};
use crate::topology::{Pattern, Route, Stop};

#[derive(Deserialize)]
struct RawRouteFile {
    data: Option<RawRouteData>,
}

#[derive(Deserialize)]
struct RawRouteData {
    route: Option<RawRoute>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawRoute {
    id: Option<String>,
    desc: Option<String>,
    agency: Option<RawAgency>,
    long_name: Option<String>,
    short_name: Option<String>,
    mode: Option<String>,
    #[serde(rename = "type")]
    route_type: Option<i64>,
    color: Option<String>,
    text_color: Option<String>,
    patterns: Option<Vec<RawPattern>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawAgency {
    name: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawPattern {
    id: Option<String>,
    headsign: Option<String>,
    from_stop_name: Option<String>,
    name: Option<String>,
    stops: Option<Vec<RawStop>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawStop {
    id: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    name: Option<String>,
    location_type: Option<String>,
}

/// Decodes one route document (`{"data": {"route": {...}}}`).
///
/// Returns `Ok(None)` when the document carries no route. Patterns without
/// stops are dropped.
pub fn parse_route_file(bytes: &[u8]) -> Result<Option<Route>> {
    let file: RawRouteFile =
        serde_json::from_slice(bytes).context("route document is not valid JSON")?;

    let Some(raw) = file.data.and_then(|d| d.route) else {
        return Ok(None);
    };

    let route_id = raw.id.unwrap_or_default();
    let mut patterns = Vec::new();

    for p in raw.patterns.unwrap_or_default() {
        let stops: Vec<Stop> = p
            .stops
            .unwrap_or_default()
            .into_iter()
            .map(|s| {
                Stop::new(
                    s.id.unwrap_or_default(),
                    s.lat.unwrap_or(0.0),
                    s.lon.unwrap_or(0.0),
                    s.name.unwrap_or_default(),
                    s.location_type.unwrap_or_default(),
                )
            })
            .collect();

        match Pattern::new(
            p.id.unwrap_or_default(),
            p.headsign.unwrap_or_default(),
            p.from_stop_name.unwrap_or_default(),
            p.name.unwrap_or_default(),
            stops,
        ) {
            Ok(pattern) => patterns.push(pattern),
            Err(e) => debug!(route = %route_id, error = %e, "Dropping pattern"),
        }
    }

    Ok(Some(Route {
        id: route_id,
        desc: raw.desc.unwrap_or_default(),
        agency_name: raw.agency.and_then(|a| a.name).unwrap_or_default(),
        long_name: raw.long_name.unwrap_or_default(),
        short_name: raw.short_name.unwrap_or_default(),
        mode: raw.mode.unwrap_or_default(),
        route_type: raw.route_type.unwrap_or(0),
        color: raw.color.unwrap_or_default(),
        text_color: raw.text_color.unwrap_or_default(),
        patterns,
    }))
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawDelayFile {
    route_info: Option<RawRouteInfo>,
    routes: Option<Vec<RawJourney>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawRouteInfo {
    start_station: Option<String>,
    end_station: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawJourney {
    train_name: Option<String>,
    route_segments: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawLeg {
    leg_number: Option<u32>,
    train_name: Option<serde_json::Value>,
    train_number: Option<serde_json::Value>,
    train_full_name: Option<serde_json::Value>,
    departure_scheduled: Option<String>,
    departure_actual: Option<String>,
    departure_delay: Option<i64>,
    arrival_scheduled: Option<String>,
    arrival_actual: Option<String>,
    arrival_delay: Option<i64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Train labels show up both as strings and as bare numbers.
fn train_label(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => non_empty(Some(s)),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes one delay snapshot into one observation per journey leg.
///
/// Every leg is labeled with the document's station pair; `pair` overrides
/// the pair stored in `route_info`. Legs that fail to decode are skipped
/// without affecting the rest of the document.
pub fn parse_delay_file(bytes: &[u8], pair: Option<(&str, &str)>) -> Result<Vec<DelayObservation>> {
    let file: RawDelayFile =
        serde_json::from_slice(bytes).context("delay document is not valid JSON")?;

    let info = file.route_info.unwrap_or_default();
    let (start_station, end_station) = match pair {
        Some((start, end)) => (start.to_string(), end.to_string()),
        None => (
            info.start_station.unwrap_or_default(),
            info.end_station.unwrap_or_default(),
        ),
    };

    let mut observations = Vec::new();
    let mut skipped = 0usize;

    for (journey, raw_journey) in file.routes.unwrap_or_default().into_iter().enumerate() {
        for value in raw_journey.route_segments.unwrap_or_default() {
            let leg: RawLeg = match serde_json::from_value(value) {
                Ok(leg) => leg,
                Err(e) => {
                    skipped += 1;
                    debug!(journey, error = %e, "Skipping undecodable leg");
                    continue;
                }
            };

            let train = train_label(leg.train_full_name)
                .or_else(|| train_label(leg.train_number))
                .or_else(|| train_label(leg.train_name))
                .or_else(|| non_empty(raw_journey.train_name.clone()));

            observations.push(DelayObservation {
                start_station: start_station.clone(),
                end_station: end_station.clone(),
                journey,
                leg_number: leg.leg_number.unwrap_or(0),
                train,
                departure_scheduled: leg.departure_scheduled.as_deref().and_then(parse_time_of_day),
                departure_actual: leg.departure_actual.as_deref().and_then(parse_time_of_day),
                arrival_scheduled: leg.arrival_scheduled.as_deref().and_then(parse_time_of_day),
                arrival_actual: leg.arrival_actual.as_deref().and_then(parse_time_of_day),
                departure_delay: leg.departure_delay,
                arrival_delay: leg.arrival_delay,
            });
        }
    }

    if skipped > 0 {
        warn!(
            start = %start_station,
            end = %end_station,
            skipped,
            "Skipped undecodable legs in delay document"
        );
    }

    Ok(observations)
}

/// Station pair and capture time encoded in a snapshot file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotName {
    pub start: String,
    pub end: String,
    pub timestamp: String,
}

/// Last path component of a local path or an S3 key.
fn file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Parses `bulk_<start>_<end>_<YYYYMMDD>_<HHMMSS>.json`, ignoring any
/// leading directory components.
pub fn parse_snapshot_name(name: &str) -> Option<SnapshotName> {
    let stem = file_name(name).strip_prefix("bulk_")?.strip_suffix(".json")?;

    let parts: Vec<&str> = stem.split('_').collect();
    let [start, end, date, time] = parts[..] else {
        return None;
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(start) || !all_digits(end) {
        return None;
    }
    if date.len() != 8 || time.len() != 6 || !all_digits(date) || !all_digits(time) {
        return None;
    }

    Some(SnapshotName {
        start: start.to_string(),
        end: end.to_string(),
        timestamp: format!("{date}_{time}"),
    })
}

/// Keeps the latest snapshot per station pair.
///
/// File names containing `_compact` are dropped; directories and prefixes
/// are not looked at. Names that do not follow the
/// snapshot pattern are all kept, in their original order, after the
/// selected snapshots.
pub fn select_latest_snapshots(names: Vec<String>) -> Vec<(String, Option<SnapshotName>)> {
    let mut latest: HashMap<(String, String), usize> = HashMap::new();
    let mut snapshots: Vec<(String, SnapshotName)> = Vec::new();
    let mut others = Vec::new();

    for name in names {
        if file_name(&name).contains("_compact") {
            continue;
        }

        let Some(snapshot) = parse_snapshot_name(&name) else {
            others.push((name, None));
            continue;
        };

        let key = (snapshot.start.clone(), snapshot.end.clone());
        match latest.get(&key) {
            Some(&slot) => {
                if snapshot.timestamp > snapshots[slot].1.timestamp {
                    snapshots[slot] = (name, snapshot);
                }
            }
            None => {
                latest.insert(key, snapshots.len());
                snapshots.push((name, snapshot));
            }
        }
    }

    snapshots
        .into_iter()
        .map(|(name, snapshot)| (name, Some(snapshot)))
        .chain(others)
        .collect()
}
