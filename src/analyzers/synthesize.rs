use crate::analyzers::grade::{DelayBucket, MaxDelayTier};
use crate::analyzers::matcher::{PatternRange, find_pattern_ranges};
use crate::analyzers::types::{RenderSegment, StationPairSummary};
use crate::topology::Route;
use std::collections::HashSet;
use tracing::debug;

/// Expands one pair summary into a segment per matching pattern range.
///
/// Stops are walked from `start` to `end` inclusive. Ranges that collapse to
/// fewer than two coordinates are dropped.
pub fn synthesize_segments(
    summary: &StationPairSummary,
    ranges: &[PatternRange],
) -> Vec<RenderSegment> {
    let bucket = DelayBucket::from_average(summary.average_delay);
    let tier = MaxDelayTier::from_max(summary.max_delay);

    ranges
        .iter()
        .filter_map(|range| {
            let walked = range.pattern.stops().get(range.start..=range.end)?;

            if walked.len() < 2 {
                debug!(
                    pattern = %range.pattern.id,
                    start = range.start,
                    end = range.end,
                    "Degenerate range, skipping"
                );
                return None;
            }

            let coordinates: Vec<[f64; 2]> = walked.iter().map(|s| s.coordinate()).collect();
            let stations: Vec<String> = walked.iter().map(|s| s.name.clone()).collect();

            Some(RenderSegment {
                coordinates,
                route_id: range.route.id.clone(),
                route_desc: range.route.display_desc().to_string(),
                route_color: range.route.color.clone(),
                pattern_name: range.pattern.display_name().to_string(),
                start_station: stations[0].clone(),
                end_station: stations[stations.len() - 1].clone(),
                average_delay: summary.average_delay,
                max_delay: summary.max_delay,
                sample_count: summary.sample_count,
                bucket,
                color: bucket.color().to_string(),
                weight: bucket.weight(),
                max_delay_tier: tier,
                stations,
            })
        })
        .collect()
}

/// Matches and expands every summary against the topology.
///
/// Each distinct pair is processed once; a repeated pair keeps its first
/// summary.
pub fn synthesize_all(routes: &[Route], summaries: &[StationPairSummary]) -> Vec<RenderSegment> {
    let mut processed: HashSet<(&str, &str)> = HashSet::new();
    let mut segments = Vec::new();
    let mut unmatched = 0usize;

    for summary in summaries {
        let pair = (summary.start_station.as_str(), summary.end_station.as_str());
        if !processed.insert(pair) {
            continue;
        }

        let ranges = find_pattern_ranges(routes, pair.0, pair.1);
        if ranges.is_empty() {
            unmatched += 1;
            continue;
        }

        segments.extend(synthesize_segments(summary, &ranges));
    }

    debug!(
        pairs = processed.len(),
        unmatched,
        segments = segments.len(),
        "Synthesized render segments"
    );

    segments
}
