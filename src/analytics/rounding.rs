//! Rounding and ratio helpers shared by the analytics

/// Round to 1 decimal place (per-day and per-session averages)
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to 2 decimal places (percentages and ratios)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Mean of the values, or 0 when there are none
pub fn mean(values: &[f64]) -> f64 {
    safe_ratio(values.iter().sum(), values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(3.333), 3.3);
        assert_eq!(round1(3.36), 3.4);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.3333), 33.33);
        assert_eq!(round2(66.666), 66.67);
    }

    #[test]
    fn test_safe_ratio_never_nan() {
        assert_eq!(safe_ratio(5.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(6.0, 3.0), 2.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
