/// Extracts the canonical station code from a carrier-specific composite id.
///
/// Composite ids look like `1:005514449_0`: the carrier prefix ends at the
/// first `:` and the trailing qualifier starts at the first `_`, so the
/// example yields `005514449`.
///
/// An id without `:` is returned unchanged and will simply never match a
/// delay-side code. A composite id with nothing between the delimiters,
/// such as `1:_0`, yields an empty code.
pub fn canonical_station_code(raw_id: &str) -> &str {
    let Some((_, rest)) = raw_id.split_once(':') else {
        return raw_id;
    };

    let segment = rest.split(':').next().unwrap_or(rest);
    segment.split('_').next().unwrap_or(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_code_between_delimiters() {
        assert_eq!(canonical_station_code("1:005514449_0"), "005514449");
        assert_eq!(canonical_station_code("1:005510009_12"), "005510009");
    }

    #[test]
    fn test_missing_qualifier_keeps_code() {
        assert_eq!(canonical_station_code("1:005514449"), "005514449");
    }

    #[test]
    fn test_extra_carrier_segments_are_ignored() {
        assert_eq!(canonical_station_code("1:005514449:x_0"), "005514449");
    }

    #[test]
    fn test_without_delimiters_returns_input() {
        assert_eq!(canonical_station_code("005514449"), "005514449");
        assert_eq!(canonical_station_code("005514449_0"), "005514449_0");
        assert_eq!(canonical_station_code(""), "");
        assert_eq!(canonical_station_code("Budapest-Keleti"), "Budapest-Keleti");
    }

    #[test]
    fn test_blank_code_segment_is_empty() {
        assert_eq!(canonical_station_code("1:"), "");
        assert_eq!(canonical_station_code("1:_0"), "");
    }
}
