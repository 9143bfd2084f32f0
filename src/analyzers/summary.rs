use crate::analyzers::types::{NetworkSummary, StationPairSummary};
use crate::analyzers::utility::{mean, pct, upper_median};

/// Pairs whose average delay exceeds this many minutes are significantly delayed.
const SIGNIFICANT_DELAY_MINUTES: f64 = 5.0;

/// Reduces pair-level average delays into network-wide statistics.
///
/// The median is the upper median (`sorted[n / 2]`). With no pairs every
/// statistic is zero.
pub fn summarize_network(summaries: &[StationPairSummary]) -> NetworkSummary {
    if summaries.is_empty() {
        return NetworkSummary::default();
    }

    let averages: Vec<f64> = summaries.iter().map(|s| s.average_delay).collect();

    let pairs_on_time = averages.iter().filter(|&&d| d <= 0.0).count();
    let pairs_delayed = averages.iter().filter(|&&d| d > 0.0).count();
    let pairs_significantly_delayed = averages
        .iter()
        .filter(|&&d| d > SIGNIFICANT_DELAY_MINUTES)
        .count();

    NetworkSummary {
        route_pairs: averages.len(),
        mean_delay: mean(&averages),
        median_delay: upper_median(&averages),
        max_delay: averages.iter().copied().fold(f64::MIN, f64::max),
        pairs_on_time,
        pairs_delayed,
        pairs_significantly_delayed,
        on_time_percentage: pct(pairs_on_time, averages.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(averages: &[f64]) -> Vec<StationPairSummary> {
        averages
            .iter()
            .enumerate()
            .map(|(i, &avg)| StationPairSummary {
                start_station: format!("S{i}"),
                end_station: format!("E{i}"),
                average_delay: avg,
                max_delay: avg.ceil() as i64,
                sample_count: 1,
            })
            .collect()
    }

    #[test]
    fn test_empty_is_zeroed() {
        assert_eq!(summarize_network(&[]), NetworkSummary::default());
    }

    #[test]
    fn test_counts_and_percentages() {
        let s = summarize_network(&pairs(&[0.0, 0.0, 3.0, 12.0]));

        assert_eq!(s.route_pairs, 4);
        assert_eq!(s.mean_delay, 3.75);
        assert_eq!(s.max_delay, 12.0);
        assert_eq!(s.pairs_on_time, 2);
        assert_eq!(s.pairs_delayed, 2);
        assert_eq!(s.pairs_significantly_delayed, 1);
        assert_eq!(s.on_time_percentage, 50.0);
    }

    #[test]
    fn test_median_even_count_uses_upper_middle() {
        let s = summarize_network(&pairs(&[8.0, 1.0, 2.0, 4.0]));
        assert_eq!(s.median_delay, 4.0);
    }

    #[test]
    fn test_median_odd_count() {
        let s = summarize_network(&pairs(&[8.0, 1.0, 2.0]));
        assert_eq!(s.median_delay, 2.0);
    }

    #[test]
    fn test_exactly_five_is_not_significant() {
        let s = summarize_network(&pairs(&[5.0]));
        assert_eq!(s.pairs_delayed, 1);
        assert_eq!(s.pairs_significantly_delayed, 0);
        assert_eq!(s.on_time_percentage, 0.0);
    }
}
