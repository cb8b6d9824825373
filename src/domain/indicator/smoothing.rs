//! Rolling-window and exponential smoothing over raw series.
//!
//! All functions return a series aligned 1:1 with the input. Rows with
//! fewer than `window` predecessors are computed from the rows actually
//! available (the warm-up region callers may drop).

/// Sum of the trailing `window` values at each row.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window > 0);
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    for (i, &value) in values.iter().enumerate() {
        acc += value;
        if i >= window {
            acc -= values[i - window];
        }
        out.push(acc);
    }
    out
}

/// Trailing mean with a progressively growing divisor: rows inside the
/// warm-up region divide by the number of rows present, not `window`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_sum(values, window)
        .into_iter()
        .enumerate()
        .map(|(i, sum)| sum / window.min(i + 1) as f64)
        .collect()
}

/// Finite-horizon exponential moving average.
///
/// The weight of a value `shift` rows back is (1-alpha)^shift with
/// alpha = 2/(1+window), summed over at most `window` terms and
/// normalized by the weights actually used, so early rows average over
/// fewer terms instead of decaying toward zero.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window > 0);
    let alpha = 2.0 / (1.0 + window as f64);
    let decay = 1.0 - alpha;

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let mut weighted = 0.0;
        let mut coef = 0.0;
        let mut weight = 1.0;
        for shift in 0..window.min(i + 1) {
            weighted += values[i - shift] * weight;
            coef += weight;
            weight *= decay;
        }
        out.push(weighted / coef);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rolling_sum_basic() {
        let out = rolling_sum(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out, vec![1.0, 3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn rolling_sum_window_larger_than_series() {
        let out = rolling_sum(&[1.0, 2.0], 5);
        assert_eq!(out, vec![1.0, 3.0]);
    }

    #[test]
    fn rolling_sum_empty() {
        assert!(rolling_sum(&[], 3).is_empty());
    }

    #[test]
    fn rolling_mean_progressive_divisor() {
        let out = rolling_mean(&[3.0, 6.0, 9.0, 12.0], 3);
        // divisors 1, 2, 3, 3
        assert_relative_eq!(out[0], 3.0);
        assert_relative_eq!(out[1], 4.5);
        assert_relative_eq!(out[2], 6.0);
        assert_relative_eq!(out[3], 9.0);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let out = ema(&[7.0; 10], 4);
        for value in out {
            assert_relative_eq!(value, 7.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn ema_first_row_is_the_value() {
        let out = ema(&[5.0, 100.0, 100.0], 4);
        assert_relative_eq!(out[0], 5.0);
    }

    #[test]
    fn ema_known_weights() {
        // window 3: alpha = 0.5, weights 1, 0.5, 0.25
        let out = ema(&[2.0, 4.0, 8.0], 3);
        let expected = (8.0 + 4.0 * 0.5 + 2.0 * 0.25) / (1.0 + 0.5 + 0.25);
        assert_relative_eq!(out[2], expected, max_relative = 1e-12);
    }

    #[test]
    fn ema_lookback_capped_at_window() {
        // With window 2 the value two rows back must not contribute.
        let out = ema(&[1000.0, 3.0, 6.0], 2);
        let expected = (6.0 + 3.0 * (1.0 / 3.0)) / (1.0 + 1.0 / 3.0);
        assert_relative_eq!(out[2], expected, max_relative = 1e-12);
    }

    #[test]
    fn ema_window_one_copies_input() {
        let out = ema(&[1.0, 2.0, 3.0], 1);
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }
}
