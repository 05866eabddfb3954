// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the signal engine
// reads: SMA for the mid-term trend, RSI and MACD for short-term momentum.
// Every public function returns an empty series or `Option` on insufficient
// data so callers are forced to handle the short-history case.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
