// =============================================================================
// Technical Signal Engine
// =============================================================================
//
// Turns two OHLCV series into a directional recommendation with price levels:
//
//   (1) Trend series (longer period): SMA50 vs SMA200 for the mid-term trend,
//       plus swing highs/lows for support/resistance.
//   (2) Momentum series (shorter period): RSI(14) and MACD(12,26,9).
//   (3) Score-based recommendation: LONG, SHORT, or NO_ACTION.
//   (4) Suggested trade with entry, stop_loss, and take_profit.
//
// The whole pipeline is a pure function of its inputs: identical series give
// byte-identical reports, and nothing here performs I/O or holds state.
// =============================================================================

pub mod swing;

use serde::{Deserialize, Serialize};

use crate::indicators::macd::latest_macd;
use crate::indicators::rsi::latest_rsi;
use crate::indicators::sma::latest_sma;
use crate::ta::swing::{find_swing_levels, SwingLevels};
use crate::types::{Candle, Recommendation, Trend};

// =============================================================================
// Engine constants — calibrated design choices, fixed by contract
// =============================================================================

/// SMA periods classifying the mid-term trend.
const TREND_SMA_FAST: usize = 50;
const TREND_SMA_SLOW: usize = 200;

/// Minimum bars: the trend series must cover the slow SMA, the momentum
/// series must cover the MACD slow leg.
pub const MIN_TREND_BARS: usize = 200;
pub const MIN_MOMENTUM_BARS: usize = 26;

/// RSI parameters.
const RSI_PERIOD: usize = 14;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

/// MACD parameters.
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

/// Absolute score needed before a directional call is made.
const LONG_SCORE_THRESHOLD: i32 = 2;
const SHORT_SCORE_THRESHOLD: i32 = -2;

/// Stop-loss sits 2% beyond the secondary level; take-profit fallbacks sit 2%
/// beyond entry.
const LONG_STOP_RATIO: f64 = 0.98;
const SHORT_STOP_RATIO: f64 = 1.02;
const LONG_TP_FALLBACK_RATIO: f64 = 1.02;
const SHORT_TP_FALLBACK_RATIO: f64 = 0.98;

/// Swing levels reported per side.
const REPORTED_LEVELS: usize = 2;

// =============================================================================
// Errors
// =============================================================================

/// Typed failure for a single analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A candle series is shorter than the minimum its indicators require.
    /// Fatal for this call; the caller should skip the symbol rather than
    /// retry with the same data.
    InsufficientData {
        series: &'static str,
        required: usize,
        actual: usize,
    },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientData {
                series,
                required,
                actual,
            } => write!(
                f,
                "insufficient {series} data: need {required} candles, got {actual}"
            ),
        }
    }
}

impl std::error::Error for AnalysisError {}

// =============================================================================
// Report types
// =============================================================================

/// Final indicator readings included in every report, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    pub sma_50: f64,
    pub sma_200: f64,
    pub rsi_14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
}

/// Top-2 swing levels per side, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingSnapshot {
    /// Descending: nearest resistance first.
    pub local_highs: Vec<f64>,
    /// Ascending: nearest support first.
    pub local_lows: Vec<f64>,
}

/// Suggested price levels.  All three are `None` for NO_ACTION.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTrade {
    pub entry: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl SuggestedTrade {
    fn none() -> Self {
        Self {
            entry: None,
            stop_loss: None,
            take_profit: None,
        }
    }
}

/// Structured result of one analysis call.  Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub recommendation: Recommendation,
    pub overall_score: i32,
    pub reason: Vec<String>,
    pub indicator_values: IndicatorValues,
    pub swing_levels: SwingSnapshot,
    pub suggested_trade: SuggestedTrade,
}

// =============================================================================
// Public entry point
// =============================================================================

/// Analyze a trend series and a momentum series into a [`SignalReport`].
///
/// `trend_series` needs at least [`MIN_TREND_BARS`] candles (SMA200),
/// `momentum_series` at least [`MIN_MOMENTUM_BARS`] (MACD slow leg);
/// otherwise the call fails with [`AnalysisError::InsufficientData`] and no
/// partial report is produced.  `swing_lookback` bounds the swing scan on the
/// trend series.
pub fn analyze(
    trend_series: &[Candle],
    momentum_series: &[Candle],
    swing_lookback: usize,
) -> Result<SignalReport, AnalysisError> {
    if trend_series.len() < MIN_TREND_BARS {
        return Err(AnalysisError::InsufficientData {
            series: "trend",
            required: MIN_TREND_BARS,
            actual: trend_series.len(),
        });
    }
    if momentum_series.len() < MIN_MOMENTUM_BARS {
        return Err(AnalysisError::InsufficientData {
            series: "momentum",
            required: MIN_MOMENTUM_BARS,
            actual: momentum_series.len(),
        });
    }

    // --- (1) Trend + swing levels ---------------------------------------
    let trend_closes: Vec<f64> = trend_series.iter().map(|c| c.close).collect();

    // Lengths were validated above, so both SMAs exist.
    let sma_fast = latest_sma(&trend_closes, TREND_SMA_FAST).unwrap_or(0.0);
    let sma_slow = latest_sma(&trend_closes, TREND_SMA_SLOW).unwrap_or(0.0);
    let trend = if sma_fast > sma_slow {
        Trend::Bullish
    } else {
        Trend::Bearish
    };

    let swing = find_swing_levels(trend_series, swing_lookback);

    // --- (2) Momentum ----------------------------------------------------
    let momentum_closes: Vec<f64> = momentum_series.iter().map(|c| c.close).collect();

    let rsi = latest_rsi(&momentum_closes, RSI_PERIOD).ok_or(AnalysisError::InsufficientData {
        series: "momentum",
        required: RSI_PERIOD + 1,
        actual: momentum_closes.len(),
    })?;
    let macd = latest_macd(&momentum_closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL).ok_or(
        AnalysisError::InsufficientData {
            series: "momentum",
            required: MIN_MOMENTUM_BARS,
            actual: momentum_closes.len(),
        },
    )?;

    // --- (3) Score & recommendation --------------------------------------
    let (overall_score, mut reason, mut recommendation) =
        build_score(trend, rsi, macd.histogram);

    // Support/resistance data is mandatory for a tradeable signal.
    if swing.is_empty() {
        recommendation = Recommendation::NoAction;
        reason.push("No local swing highs/lows found. No trade suggested.".to_string());
    }

    // --- (4) Suggested trade ----------------------------------------------
    let (suggested_trade, trade_reasons) = suggest_trade(recommendation, &swing);
    reason.extend(trade_reasons);

    // --- (5) Final report -------------------------------------------------
    Ok(SignalReport {
        recommendation,
        overall_score,
        reason,
        indicator_values: IndicatorValues {
            sma_50: round2(sma_fast),
            sma_200: round2(sma_slow),
            rsi_14: round2(rsi),
            macd: round2(macd.macd),
            macd_signal: round2(macd.signal),
            macd_histogram: round2(macd.histogram),
        },
        swing_levels: SwingSnapshot {
            local_highs: swing
                .highs
                .iter()
                .take(REPORTED_LEVELS)
                .map(|&h| round2(h))
                .collect(),
            local_lows: swing
                .lows
                .iter()
                .take(REPORTED_LEVELS)
                .map(|&l| round2(l))
                .collect(),
        },
        suggested_trade,
    })
}

// =============================================================================
// Internal steps
// =============================================================================

/// Combine trend, RSI, and MACD histogram into a score in -3..=+3, a reason
/// trail, and the resulting recommendation.
fn build_score(trend: Trend, rsi: f64, macd_hist: f64) -> (i32, Vec<String>, Recommendation) {
    let mut score = 0;
    let mut reason = Vec::new();

    match trend {
        Trend::Bullish => {
            score += 1;
            reason.push("Trend is bullish (SMA50 > SMA200).".to_string());
        }
        Trend::Bearish => {
            score -= 1;
            reason.push("Trend is bearish (SMA50 <= SMA200).".to_string());
        }
    }

    if rsi < RSI_OVERSOLD {
        score += 1;
        reason.push(format!("RSI(14) oversold at {rsi:.2}."));
    } else if rsi > RSI_OVERBOUGHT {
        score -= 1;
        reason.push(format!("RSI(14) overbought at {rsi:.2}."));
    } else {
        reason.push(format!("RSI(14) neutral at {rsi:.2}."));
    }

    if macd_hist > 0.0 {
        score += 1;
        reason.push("MACD histogram positive -> bullish momentum.".to_string());
    } else {
        score -= 1;
        reason.push("MACD histogram negative -> bearish momentum.".to_string());
    }

    let recommendation = if score >= LONG_SCORE_THRESHOLD {
        reason.push("Overall score >= 2 -> LONG signal.".to_string());
        Recommendation::Long
    } else if score <= SHORT_SCORE_THRESHOLD {
        reason.push("Overall score <= -2 -> SHORT signal.".to_string());
        Recommendation::Short
    } else {
        reason.push("Score in [-1,1] -> NO_ACTION.".to_string());
        Recommendation::NoAction
    };

    (score, reason, recommendation)
}

/// Derive entry / stop-loss / take-profit from the top-2 swing levels.
///
/// Missing resistances fall back to the window's overall high, missing
/// supports to its overall low.  A take-profit on the wrong side of the entry
/// falls back to a 2% offset.
fn suggest_trade(
    recommendation: Recommendation,
    swing: &SwingLevels,
) -> (SuggestedTrade, Vec<String>) {
    let mut reason = Vec::new();

    if swing.is_empty() || recommendation == Recommendation::NoAction {
        if recommendation == Recommendation::NoAction && !swing.is_empty() {
            reason.push("No trade suggested for NO_ACTION.".to_string());
        }
        return (SuggestedTrade::none(), reason);
    }

    let r1 = swing.highs.first().copied().unwrap_or(swing.window_high);
    let r2 = swing.highs.get(1).copied().unwrap_or(swing.window_high);
    let s1 = swing.lows.first().copied().unwrap_or(swing.window_low);
    let s2 = swing.lows.get(1).copied().unwrap_or(swing.window_low);

    let trade = match recommendation {
        Recommendation::Long => {
            let entry = s1;
            let stop_loss = s2 * LONG_STOP_RATIO;
            let mut take_profit = if r1 > entry { r1 } else { r2 };
            if take_profit <= entry {
                take_profit = entry * LONG_TP_FALLBACK_RATIO;
            }

            reason.push(format!(
                "LONG: entry ~ S1={entry:.2}, SL < S2={stop_loss:.2}, TP ~ R1={take_profit:.2}"
            ));

            SuggestedTrade {
                entry: Some(round2(entry)),
                stop_loss: Some(round2(stop_loss)),
                take_profit: Some(round2(take_profit)),
            }
        }
        Recommendation::Short => {
            let entry = r1;
            let stop_loss = r2 * SHORT_STOP_RATIO;
            let mut take_profit = if s1 < entry { s1 } else { s2 };
            if take_profit >= entry {
                take_profit = entry * SHORT_TP_FALLBACK_RATIO;
            }

            reason.push(format!(
                "SHORT: entry ~ R1={entry:.2}, SL > R2={stop_loss:.2}, TP ~ S1={take_profit:.2}"
            ));

            SuggestedTrade {
                entry: Some(round2(entry)),
                stop_loss: Some(round2(stop_loss)),
                take_profit: Some(round2(take_profit)),
            }
        }
        Recommendation::NoAction => SuggestedTrade::none(),
    };

    (trade, reason)
}

/// Round to 2 decimal places for report output.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
