//! Static network topology: routes own patterns, patterns own ordered stops.

use anyhow::{Result, ensure};
use serde::Serialize;
use std::collections::HashSet;

use crate::analyzers::normalize::canonical_station_code;

/// A single stop on a pattern. The canonical `code` is derived from `raw_id`
/// once, when the stop is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub raw_id: String,
    pub code: String,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub location_type: String,
}

impl Stop {
    pub fn new(
        raw_id: impl Into<String>,
        lat: f64,
        lon: f64,
        name: impl Into<String>,
        location_type: impl Into<String>,
    ) -> Self {
        let raw_id = raw_id.into();
        let code = canonical_station_code(&raw_id).to_string();

        Self {
            raw_id,
            code,
            lat,
            lon,
            name: name.into(),
            location_type: location_type.into(),
        }
    }

    pub fn coordinate(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// One direction of travel on a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub id: String,
    pub headsign: String,
    pub from_stop_name: String,
    pub name: String,
    stops: Vec<Stop>,
}

impl Pattern {
    /// Builds a pattern, rejecting an empty stop list.
    pub fn new(
        id: impl Into<String>,
        headsign: impl Into<String>,
        from_stop_name: impl Into<String>,
        name: impl Into<String>,
        stops: Vec<Stop>,
    ) -> Result<Self> {
        let id = id.into();
        ensure!(!stops.is_empty(), "pattern '{id}' has no stops");

        Ok(Self {
            id,
            headsign: headsign.into(),
            from_stop_name: from_stop_name.into(),
            name: name.into(),
            stops,
        })
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Display name used on rendered segments.
    pub fn display_name(&self) -> &str {
        if !self.headsign.is_empty() {
            &self.headsign
        } else if !self.name.is_empty() {
            &self.name
        } else {
            "Unknown Pattern"
        }
    }
}

/// A named line with its descriptive metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Route {
    pub id: String,
    pub desc: String,
    pub agency_name: String,
    pub long_name: String,
    pub short_name: String,
    pub mode: String,
    pub route_type: i64,
    pub color: String,
    pub text_color: String,
    pub patterns: Vec<Pattern>,
}

impl Route {
    pub fn display_desc(&self) -> &str {
        if self.desc.is_empty() {
            "Unknown Route"
        } else {
            &self.desc
        }
    }
}

/// Collects one stop per canonical code across all routes, first seen wins.
pub fn unique_stations(routes: &[Route]) -> Vec<&Stop> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stations = Vec::new();

    for stop in routes
        .iter()
        .flat_map(|r| &r.patterns)
        .flat_map(|p| p.stops())
    {
        if stop.code.is_empty() {
            continue;
        }
        if seen.insert(stop.code.as_str()) {
            stations.push(stop);
        }
    }

    stations
}
