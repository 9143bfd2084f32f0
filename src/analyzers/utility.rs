/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Returns the element at index `len / 2` of the ascending-sorted values.
///
/// For even lengths this is the upper of the two middle elements, not their
/// average. Returns 0.0 for empty input.
pub fn upper_median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    sorted[sorted.len() / 2]
}

/// `part / total` as a percentage, 0.0 when `total` is zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[5.0, 8.0]), 6.5);
    }

    #[test]
    fn test_upper_median_odd() {
        assert_eq!(upper_median(&[9.0, 1.0, 4.0]), 4.0);
    }

    #[test]
    fn test_upper_median_even_takes_upper_middle() {
        assert_eq!(upper_median(&[4.0, 1.0, 3.0, 2.0]), 3.0);
        assert_eq!(upper_median(&[0.0, 10.0]), 10.0);
    }

    #[test]
    fn test_upper_median_empty() {
        assert_eq!(upper_median(&[]), 0.0);
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(10, 0), 0.0);
        assert_eq!(pct(1, 4), 25.0);
    }
}
