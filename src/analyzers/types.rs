//! Data types produced by the join-and-aggregate pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzers::grade::{DelayBucket, MaxDelayTier};

/// Delay statistics for one `(start, end)` station pair.
///
/// `sample_count` is the number of positive delay values folded in, not the
/// number of journeys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPairSummary {
    pub start_station: String,
    pub end_station: String,
    pub average_delay: f64,
    pub max_delay: i64,
    pub sample_count: usize,
}

/// A drawable stretch of one pattern, annotated with its pair's delays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSegment {
    /// `[lat, lon]` points, at least two.
    pub coordinates: Vec<[f64; 2]>,
    pub route_id: String,
    pub route_desc: String,
    pub route_color: String,
    pub pattern_name: String,
    pub start_station: String,
    pub end_station: String,
    pub average_delay: f64,
    pub max_delay: i64,
    pub sample_count: usize,
    pub bucket: DelayBucket,
    pub color: String,
    pub weight: u8,
    pub max_delay_tier: MaxDelayTier,
    pub stations: Vec<String>,
}

/// Network-wide statistics over pair-level average delays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub route_pairs: usize,
    pub mean_delay: f64,
    pub median_delay: f64,
    pub max_delay: f64,
    pub pairs_on_time: usize,
    pub pairs_delayed: usize,
    pub pairs_significantly_delayed: usize,
    pub on_time_percentage: f64,
}

/// Everything a consumer needs to draw the map and the summary panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderState {
    pub segments: Vec<RenderSegment>,
    pub summary: NetworkSummary,
}

/// Render state as published to disk or S3.
#[derive(Debug, Serialize)]
pub struct RenderDocument<'a> {
    pub(crate) schema_version: u8,
    pub(crate) generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) state: &'a RenderState,
}

impl<'a> RenderDocument<'a> {
    pub fn new(state: &'a RenderState) -> Self {
        Self {
            schema_version: 1,
            generated_at: Utc::now(),
            state,
        }
    }
}

/// One row of the summary history CSV.
#[derive(Debug, Serialize)]
pub struct SummaryRecord {
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) segments: usize,
    pub(crate) route_pairs: usize,
    pub(crate) mean_delay: f64,
    pub(crate) median_delay: f64,
    pub(crate) max_delay: f64,
    pub(crate) pairs_on_time: usize,
    pub(crate) pairs_delayed: usize,
    pub(crate) pairs_significantly_delayed: usize,
    pub(crate) on_time_percentage: f64,
}

impl SummaryRecord {
    pub fn from_state(state: &RenderState) -> Self {
        let s = &state.summary;
        Self {
            timestamp: Utc::now(),
            segments: state.segments.len(),
            route_pairs: s.route_pairs,
            mean_delay: s.mean_delay,
            median_delay: s.median_delay,
            max_delay: s.max_delay,
            pairs_on_time: s.pairs_on_time,
            pairs_delayed: s.pairs_delayed,
            pairs_significantly_delayed: s.pairs_significantly_delayed,
            on_time_percentage: s.on_time_percentage,
        }
    }
}
