//! Small statistics helpers for the acceptance gate.

/// Pearson correlation of two equal-length series. Degenerate inputs
/// (short series, zero variance) correlate to 0.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let a = &a[..n];
    let b = &b[..n];
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

/// Lag-1 autocorrelation: how much today predicts tomorrow.
pub fn lag1_autocorrelation(series: &[f64]) -> f64 {
    if series.len() < 3 {
        return 0.0;
    }
    pearson(&series[..series.len() - 1], &series[1..])
}

/// Mean absolute difference between consecutive samples.
pub fn mean_abs_delta(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    series
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .sum::<f64>()
        / (series.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect_correlation() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [10.0, 20.0, 30.0, 40.0];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);
        let neg: Vec<f64> = b.iter().map(|v| -v).collect();
        assert!((pearson(&a, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_uncorrelated_orthogonal() {
        let a = [1.0, -1.0, 1.0, -1.0];
        let b = [1.0, 1.0, -1.0, -1.0];
        assert!(pearson(&a, &b).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_is_zero() {
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_lag1_of_smooth_series_is_high() {
        let series: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
        assert!(lag1_autocorrelation(&series) > 0.9);
    }

    #[test]
    fn test_lag1_of_alternating_series_is_negative() {
        let series: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!(lag1_autocorrelation(&series) < -0.9);
    }

    #[test]
    fn test_mean_abs_delta() {
        assert_eq!(mean_abs_delta(&[0.0, 5.0, 0.0, 5.0]), 5.0);
        assert_eq!(mean_abs_delta(&[1.0]), 0.0);
    }
}
