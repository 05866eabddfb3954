// =============================================================================
// Upstream Data Sources
// =============================================================================
//
// Thin HTTP clients for the two collaborators the engines consume:
//
//   - `cookie`        — the agent discovery API (paged agent records)
//   - `cryptocompare` — hourly OHLCV candle history
//
// Both are plain request/parse wrappers: no retry, no backoff, no caching.
// Upstream failures surface to the caller as `anyhow` errors with context.

pub mod cookie;
pub mod cryptocompare;
