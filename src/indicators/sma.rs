// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// The unweighted mean of the last `period` closes.  The 50/200 pair of SMAs
// on the trend series is what classifies the mid-term trend: SMA50 above
// SMA200 at the latest bar reads bullish, anything else bearish.
// =============================================================================

/// Compute the SMA series for `closes` with the given look-back `period`.
///
/// Each output element corresponds to a close starting at index `period - 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period` => empty vec
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    let mut result = Vec::with_capacity(closes.len() - period + 1);

    // Rolling sum instead of re-summing every window.
    let mut sum: f64 = closes[..period].iter().sum();
    result.push(sum / period_f);

    for i in period..closes.len() {
        sum += closes[i] - closes[i - period];
        result.push(sum / period_f);
    }

    result
}

/// Most recent SMA value, or `None` when the series is too short.
pub fn latest_sma(closes: &[f64], period: usize) -> Option<f64> {
    calculate_sma(closes, period).last().copied()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 5).is_empty());
    }

    #[test]
    fn sma_period_zero() {
        assert!(calculate_sma(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn sma_insufficient_data() {
        assert!(calculate_sma(&[1.0, 2.0], 3).is_empty());
        assert!(latest_sma(&[1.0, 2.0], 3).is_none());
    }

    #[test]
    fn sma_known_values() {
        // 3-period SMA of [1,2,3,4,5] => [2,3,4]
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(sma.len(), 3);
        for (got, want) in sma.iter().zip([2.0, 3.0, 4.0]) {
            assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
        }
    }

    #[test]
    fn sma_flat_series() {
        let sma = calculate_sma(&[100.0; 10], 4);
        assert_eq!(sma.len(), 7);
        for &v in &sma {
            assert!((v - 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn latest_sma_matches_tail_mean() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        // Mean of [6..=10] = 8.
        let v = latest_sma(&closes, 5).unwrap();
        assert!((v - 8.0).abs() < 1e-12);
    }
}
