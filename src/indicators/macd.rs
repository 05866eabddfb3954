// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
// MACD line  = EMA(fast) - EMA(slow)
// Signal     = EMA(signal_period) of the MACD line
// Histogram  = MACD line - Signal
//
// The fast/slow EMAs are SMA-seeded (see `indicators::ema`).  The signal line
// seeds from the first MACD value instead, so the full triple is defined as
// soon as `closes.len() >= slow_period` — the engine's documented minimum of
// 26 bars for the momentum series.
// =============================================================================

use crate::indicators::ema::calculate_ema;

/// One aligned MACD sample: line value, signal line, and histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the aligned MACD series for `closes`.
///
/// One point per close starting at index `slow - 1`.
///
/// # Edge cases
/// - `fast == 0`, `slow == 0`, `signal_period == 0`, or `fast >= slow`
///   => empty vec
/// - `closes.len() < slow` => empty vec
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Vec<MacdPoint> {
    if fast == 0 || slow == 0 || signal_period == 0 || fast >= slow || closes.len() < slow {
        return Vec::new();
    }

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    // ema_fast starts `slow - fast` inputs earlier than ema_slow; line them up
    // on the slow EMA's indices.
    let offset = slow - fast;
    let line: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .filter_map(|(i, &s)| ema_fast.get(i + offset).map(|&f| f - s))
        .collect();

    if line.is_empty() {
        return Vec::new();
    }

    let signal = ema_from_first(&line, signal_period);

    line.iter()
        .zip(signal.iter())
        .map(|(&m, &s)| MacdPoint {
            macd: m,
            signal: s,
            histogram: m - s,
        })
        .collect()
}

/// Most recent MACD point, or `None` when the series is too short.
pub fn latest_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Option<MacdPoint> {
    calculate_macd(closes, fast, slow, signal_period).last().copied()
}

/// EMA seeded from the first element, producing one output per input.
fn ema_from_first(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() || period == 0 {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;
    let mut result = Vec::with_capacity(values.len());
    let mut prev = values[0];
    result.push(prev);

    for &v in &values[1..] {
        prev = v * multiplier + prev * (1.0 - multiplier);
        result.push(prev);
    }

    result
}
