use crate::topology::{Pattern, Route};

/// A directional sub-range of one pattern's stops, `start < end`.
#[derive(Debug, Clone, Copy)]
pub struct PatternRange<'a> {
    pub route: &'a Route,
    pub pattern: &'a Pattern,
    pub start: usize,
    pub end: usize,
}

/// Finds every pattern sub-range running from `start_code` to `end_code`.
///
/// Each occurrence of the start code is paired with every later occurrence
/// of the end code, so a loop line that revisits a station yields several
/// ranges. Results follow route order, then pattern order, then index order.
pub fn find_pattern_ranges<'a>(
    routes: &'a [Route],
    start_code: &str,
    end_code: &str,
) -> Vec<PatternRange<'a>> {
    let mut ranges = Vec::new();

    for route in routes {
        for pattern in &route.patterns {
            let stops = pattern.stops();

            let starts = stops
                .iter()
                .enumerate()
                .filter(|(_, s)| s.code == start_code)
                .map(|(i, _)| i);

            for start in starts {
                for (end, stop) in stops.iter().enumerate().skip(start + 1) {
                    if stop.code == end_code {
                        ranges.push(PatternRange {
                            route,
                            pattern,
                            start,
                            end,
                        });
                    }
                }
            }
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Stop;

    fn pattern(id: &str, codes: &[&str]) -> Pattern {
        let stops = codes
            .iter()
            .map(|c| Stop::new(format!("1:{c}_0"), 0.0, 0.0, *c, "STATION"))
            .collect();
        Pattern::new(id, "", "", "", stops).unwrap()
    }

    fn route(id: &str, patterns: Vec<Pattern>) -> Route {
        Route {
            id: id.into(),
            patterns,
            ..Default::default()
        }
    }

    fn spans(ranges: &[PatternRange]) -> Vec<(String, usize, usize)> {
        ranges
            .iter()
            .map(|r| (r.pattern.id.clone(), r.start, r.end))
            .collect()
    }

    #[test]
    fn test_simple_match() {
        let routes = vec![route("r1", vec![pattern("p1", &["A", "B", "C", "D"])])];

        let ranges = find_pattern_ranges(&routes, "A", "C");
        assert_eq!(spans(&ranges), vec![("p1".to_string(), 0, 2)]);
    }

    #[test]
    fn test_direction_aware() {
        let routes = vec![route("r1", vec![pattern("p1", &["A", "B", "C"])])];

        assert!(find_pattern_ranges(&routes, "C", "A").is_empty());
    }

    #[test]
    fn test_loop_line_yields_every_sub_range() {
        let routes = vec![route("r1", vec![pattern("loop", &["A", "B", "A", "B"])])];

        let ranges = find_pattern_ranges(&routes, "A", "B");
        assert_eq!(
            spans(&ranges),
            vec![
                ("loop".to_string(), 0, 1),
                ("loop".to_string(), 0, 3),
                ("loop".to_string(), 2, 3),
            ]
        );
        assert!(ranges.iter().all(|r| r.end > r.start));
    }

    #[test]
    fn test_same_start_and_end_code() {
        let routes = vec![route("r1", vec![pattern("p1", &["A", "B", "A"])])];

        let ranges = find_pattern_ranges(&routes, "A", "A");
        assert_eq!(spans(&ranges), vec![("p1".to_string(), 0, 2)]);
    }

    #[test]
    fn test_matches_across_routes_in_supplied_order() {
        let routes = vec![
            route("r1", vec![pattern("p1", &["A", "X", "B"]), pattern("p2", &["B", "A"])]),
            route("r2", vec![pattern("p3", &["A", "B"])]),
        ];

        let ranges = find_pattern_ranges(&routes, "A", "B");
        assert_eq!(
            spans(&ranges),
            vec![("p1".to_string(), 0, 2), ("p3".to_string(), 0, 1)]
        );
        assert_eq!(ranges[1].route.id, "r2");
    }

    #[test]
    fn test_unknown_codes_never_match() {
        let routes = vec![route("r1", vec![pattern("p1", &["A", "B"])])];

        assert!(find_pattern_ranges(&routes, "A", "Z").is_empty());
        assert!(find_pattern_ranges(&[], "A", "B").is_empty());
    }
}
