use crate::analyzers::types::StationPairSummary;
use crate::analyzers::utility::mean;
use crate::observation::DelayObservation;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Collapses raw observations into one [`StationPairSummary`] per exact
/// `(start, end)` pair, in order of first appearance.
///
/// Departure and arrival delays of every leg are collected independently;
/// only positive values count towards the average, the maximum and
/// `sample_count`. A pair whose legs were all on time still gets a summary,
/// with every statistic at zero. Observations without a station pair are
/// skipped.
pub fn aggregate_delays(observations: &[DelayObservation]) -> Vec<StationPairSummary> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<((&str, &str), Vec<i64>)> = Vec::new();
    let mut skipped = 0usize;

    for obs in observations {
        let Some(pair) = obs.station_pair() else {
            skipped += 1;
            debug!(
                journey = obs.journey,
                leg = obs.leg_number,
                "Observation has no station pair, skipping"
            );
            continue;
        };

        let slot = *index.entry(pair).or_insert_with(|| {
            groups.push((pair, Vec::new()));
            groups.len() - 1
        });

        let delays = &mut groups[slot].1;
        for delay in [obs.departure_delay(), obs.arrival_delay()]
            .into_iter()
            .flatten()
        {
            if delay > 0 {
                delays.push(delay);
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped malformed delay observations");
    }

    let summaries: Vec<_> = groups
        .into_iter()
        .map(|((start, end), delays)| {
            let as_f64: Vec<f64> = delays.iter().map(|&d| d as f64).collect();

            StationPairSummary {
                start_station: start.to_string(),
                end_station: end.to_string(),
                average_delay: mean(&as_f64),
                max_delay: delays.iter().copied().max().unwrap_or(0),
                sample_count: delays.len(),
            }
        })
        .collect();

    debug!(
        observations = observations.len(),
        pairs = summaries.len(),
        "Aggregated delay observations"
    );

    summaries
}
