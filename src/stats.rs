// =============================================================================
// Statistics Utilities — ratios and robust normalization
// =============================================================================
//
// Small pure leaf shared by the ranking engine.  All functions are total over
// arbitrary inputs: undefined ratios come back as `None`, degenerate
// populations normalize to 0.0, and nothing here ever panics.
//
// "Robust" normalization rescales into [0, 1] between the population minimum
// and its 99th percentile, clamping values above the percentile cap so a
// single outlier cannot compress the rest of the population toward zero.
// =============================================================================

/// Percentile used as the upper cap in robust normalization.
const ROBUST_CAP_PERCENTILE: f64 = 99.0;

/// Market-cap-to-metric ratio.
///
/// Returns `None` when `metric` is zero or negative (division guard — a token
/// with no holders or zero mindshare has no meaningful ratio).
pub fn ratio(market_cap: f64, metric: f64) -> Option<f64> {
    if metric > 0.0 {
        Some(market_cap / metric)
    } else {
        None
    }
}

/// Relative efficiency of one agent's metric-to-cap ratio versus the
/// population average of that same ratio.
///
/// A value above 1.0 means the agent's metric supports more market cap than
/// the average agent's does.  Returns `None` unless the average is defined
/// and positive, the metric is positive, and the market cap is positive.
pub fn ratio_score(avg_ratio: Option<f64>, metric: f64, market_cap: f64) -> Option<f64> {
    let avg = avg_ratio?;
    if avg <= 0.0 || metric <= 0.0 || market_cap <= 0.0 {
        return None;
    }

    let agent_ratio = market_cap / metric;
    if agent_ratio <= 0.0 {
        return None;
    }

    Some(avg / agent_ratio)
}

/// Linearly interpolated percentile of `values` (NumPy's default method).
///
/// `values` need not be sorted.  Returns `None` for an empty slice.
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (sorted.len() - 1) as f64 * (pct / 100.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;

    if lo == hi {
        return Some(sorted[lo]);
    }

    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Min–99th-percentile linear rescale of `value` into [0, 1].
///
/// `value` is clamped to the percentile cap from above (never from below —
/// callers always draw `value` from `population` itself, so it cannot fall
/// under the minimum).
///
/// # Edge cases
/// - empty population => 0.0
/// - cap == min (single element, or a constant population) => 0.0
pub fn robust_normalize(value: f64, population: &[f64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }

    let min_val = population.iter().cloned().fold(f64::INFINITY, f64::min);
    let cap = match percentile(population, ROBUST_CAP_PERCENTILE) {
        Some(c) => c,
        None => return 0.0,
    };

    if cap == min_val {
        return 0.0;
    }

    let clipped = value.min(cap);
    (clipped - min_val) / (cap - min_val)
}

/// Log-space variant of [`robust_normalize`] for heavy-tailed populations.
///
/// Non-positive population entries are discarded before taking logs; a
/// non-positive `value` maps to log-space 0.0 before clamping.  An
/// all-non-positive population normalizes to 0.0 for any input.
pub fn log_robust_normalize(value: f64, population: &[f64]) -> f64 {
    let log_values: Vec<f64> = population
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| v.ln())
        .collect();

    if log_values.is_empty() {
        return 0.0;
    }

    let log_value = if value > 0.0 { value.ln() } else { 0.0 };

    let min_val = log_values.iter().cloned().fold(f64::INFINITY, f64::min);
    let cap = match percentile(&log_values, ROBUST_CAP_PERCENTILE) {
        Some(c) => c,
        None => return 0.0,
    };

    if cap == min_val {
        return 0.0;
    }

    let clipped = log_value.min(cap);
    (clipped - min_val) / (cap - min_val)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- ratio -----------------------------------------------------------

    #[test]
    fn ratio_defined_for_positive_metric() {
        // {marketCap: 1_000_000, mindshare: 10} => 100_000.
        assert_eq!(ratio(1_000_000.0, 10.0), Some(100_000.0));
    }

    #[test]
    fn ratio_undefined_for_zero_or_negative_metric() {
        assert_eq!(ratio(1_000_000.0, 0.0), None);
        assert_eq!(ratio(1_000_000.0, -5.0), None);
    }

    // ---- ratio_score -----------------------------------------------------

    #[test]
    fn ratio_score_above_one_beats_population() {
        // Population average ratio 200k, agent ratio 100k => score 2.0.
        let score = ratio_score(Some(200_000.0), 10.0, 1_000_000.0).unwrap();
        assert!((score - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_score_undefined_cases() {
        assert_eq!(ratio_score(None, 10.0, 1_000_000.0), None);
        assert_eq!(ratio_score(Some(0.0), 10.0, 1_000_000.0), None);
        assert_eq!(ratio_score(Some(200_000.0), 0.0, 1_000_000.0), None);
        assert_eq!(ratio_score(Some(200_000.0), 10.0, 0.0), None);
    }

    // ---- percentile ------------------------------------------------------

    #[test]
    fn percentile_empty_is_none() {
        assert_eq!(percentile(&[], 99.0), None);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        // NumPy: percentile([1,2,3,4], 50) == 2.5
        let p = percentile(&[1.0, 2.0, 3.0, 4.0], 50.0).unwrap();
        assert!((p - 2.5).abs() < 1e-12);
        // percentile([0..=100], 99) == 99.0
        let vals: Vec<f64> = (0..=100).map(|v| v as f64).collect();
        let p = percentile(&vals, 99.0).unwrap();
        assert!((p - 99.0).abs() < 1e-12);
    }

    #[test]
    fn percentile_unsorted_input() {
        let p = percentile(&[4.0, 1.0, 3.0, 2.0], 100.0).unwrap();
        assert!((p - 4.0).abs() < 1e-12);
    }

    // ---- robust_normalize ------------------------------------------------

    #[test]
    fn normalize_single_element_population_is_zero() {
        assert_eq!(robust_normalize(42.0, &[42.0]), 0.0);
    }

    #[test]
    fn normalize_constant_population_is_zero() {
        assert_eq!(robust_normalize(7.0, &[7.0, 7.0, 7.0]), 0.0);
    }

    #[test]
    fn normalize_clamps_outlier_to_one() {
        // 1000 is far above the 99th percentile of the rest: result clamps to 1.
        let mut pop: Vec<f64> = (0..100).map(|v| v as f64).collect();
        pop.push(1000.0);
        let n = robust_normalize(1000.0, &pop);
        assert!((n - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_min_maps_to_zero_and_stays_in_range() {
        let pop: Vec<f64> = (0..100).map(|v| v as f64).collect();
        assert_eq!(robust_normalize(0.0, &pop), 0.0);
        for &v in &pop {
            let n = robust_normalize(v, &pop);
            assert!((0.0..=1.0).contains(&n), "normalized {n} out of range");
        }
    }

    // ---- log_robust_normalize --------------------------------------------

    #[test]
    fn log_normalize_all_non_positive_population_is_zero() {
        assert_eq!(log_robust_normalize(5.0, &[0.0, -1.0, -3.0]), 0.0);
        assert_eq!(log_robust_normalize(-2.0, &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn log_normalize_ignores_non_positive_entries() {
        // Only {1, e, e^2} survive the filter: logs are {0, 1, 2}.
        // Cap = 99th pct of {0,1,2} = 1.98, so log(e)=1 maps to 1/1.98.
        let e = std::f64::consts::E;
        let pop = [0.0, -1.0, 1.0, e, e * e];
        let n = log_robust_normalize(e, &pop);
        assert!((n - 1.0 / 1.98).abs() < 1e-9, "got {n}");
    }

    #[test]
    fn log_normalize_single_positive_entry_is_zero() {
        assert_eq!(log_robust_normalize(10.0, &[10.0]), 0.0);
    }
}
