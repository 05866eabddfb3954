// =============================================================================
// Swing High / Low Detection
// =============================================================================
//
// A bar is a swing high when its high exceeds both immediate neighbours'
// highs, and a swing low when its low undercuts both neighbours' lows.  The
// scan covers the last `lookback` bars but never the first or the final bar
// of the series, so both neighbours always exist and the last (potentially
// still-forming) bar cannot print an unconfirmed swing.
// =============================================================================

use crate::types::Candle;

/// Swing levels extracted from one candle window.
///
/// `highs` is sorted descending (nearest resistance first), `lows` ascending
/// (nearest support first).  `window_high` / `window_low` are the overall
/// extremes of the scanned window, used as fallbacks when fewer than two
/// swings exist on a side.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingLevels {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub window_high: f64,
    pub window_low: f64,
}

impl SwingLevels {
    /// True when the scan found no swing points on either side.
    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}

/// Scan the last `lookback` bars of `candles` for confirmed swing highs and
/// lows.
pub fn find_swing_levels(candles: &[Candle], lookback: usize) -> SwingLevels {
    let len = candles.len();

    let mut highs = Vec::new();
    let mut lows = Vec::new();

    let start = len.saturating_sub(lookback).max(1);
    let end = len.saturating_sub(1);

    for i in start..end {
        if candles[i].high > candles[i - 1].high && candles[i].high > candles[i + 1].high {
            highs.push(candles[i].high);
        }
        if candles[i].low < candles[i - 1].low && candles[i].low < candles[i + 1].low {
            lows.push(candles[i].low);
        }
    }

    highs.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    lows.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Window extremes over the last `lookback` bars (endpoints included).
    let window = &candles[len.saturating_sub(lookback)..];
    let window_high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let window_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

    SwingLevels {
        highs,
        lows,
        window_high,
        window_low,
    }
}
