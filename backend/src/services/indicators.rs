/// Trailing simple moving average.
///
/// Returns a vector aligned with `values`:
/// - `None` for the first `window - 1` positions
/// - `Some(mean of values[i+1-window..=i])` afterwards
///
/// A `window` of 0 or one longer than the series yields all `None`.
/// Each mean is summed from its own window slice, so equal input always
/// gives bit-identical output. No rounding happens here.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || window > values.len() {
        return vec![None; values.len()];
    }

    let leading = std::iter::repeat(None).take(window - 1);
    let means = values
        .windows(window)
        .map(|w| Some(w.iter().sum::<f64>() / window as f64));

    leading.chain(means).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_basic_window() {
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!(approx(out[2].unwrap(), 2.0));
        assert!(approx(out[3].unwrap(), 3.0));
        assert!(approx(out[4].unwrap(), 4.0));
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let prices = [10.5, 11.25, 9.75];
        let out = moving_average(&prices, 1);
        assert_eq!(out, vec![Some(10.5), Some(11.25), Some(9.75)]);
    }

    #[test]
    fn test_window_equal_to_length() {
        let out = moving_average(&[2.0, 4.0, 6.0], 3);
        assert_eq!(out, vec![None, None, Some(4.0)]);
    }

    #[test]
    fn test_degenerate_windows_are_all_missing() {
        let prices = [1.0, 2.0, 3.0];
        assert_eq!(moving_average(&prices, 0), vec![None; 3]);
        assert_eq!(moving_average(&prices, 4), vec![None; 3]);
        assert!(moving_average(&[], 5).is_empty());
        assert!(moving_average(&[], 0).is_empty());
    }

    #[test]
    fn test_matches_definition_for_all_windows() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.3)
            .collect();

        for window in 0..=45 {
            let out = moving_average(&prices, window);
            assert_eq!(out.len(), prices.len());

            for (i, value) in out.iter().enumerate() {
                if window == 0 || window > prices.len() || i + 1 < window {
                    assert!(value.is_none(), "window {} index {}", window, i);
                } else {
                    let slice = &prices[i + 1 - window..=i];
                    let expected = slice.iter().sum::<f64>() / window as f64;
                    assert!(approx(value.unwrap(), expected), "window {} index {}", window, i);
                }
            }
        }
    }

    #[test]
    fn test_is_deterministic() {
        let prices = [22338.75, 22356.3, 22405.6, 22493.55, 22474.05, 22519.4];
        let first = moving_average(&prices, 3);
        let second = moving_average(&prices, 3);
        let bits = |v: &Vec<Option<f64>>| v.iter().map(|x| x.map(f64::to_bits)).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second));
    }
}
