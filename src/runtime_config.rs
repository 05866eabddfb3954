// =============================================================================
// Runtime Configuration — operational settings with atomic save
// =============================================================================
//
// Operational knobs only: scan cadence, result sizes, candle window shapes.
// The calibrated scoring constants (market-cap floor, component weights,
// indicator periods, score thresholds, level offsets) are contractual and
// live as `const`s in the engine modules — they are deliberately NOT
// configurable here.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry serde defaults so that adding new fields never
// breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_stats_interval() -> String {
    "_3Days".to_string()
}

fn default_top_k() -> usize {
    20
}

fn default_quote_currency() -> String {
    "USD".to_string()
}

fn default_trend_candle_limit() -> u32 {
    200
}

fn default_trend_aggregate_hours() -> u32 {
    4
}

fn default_momentum_candle_limit() -> u32 {
    100
}

fn default_momentum_aggregate_hours() -> u32 {
    1
}

fn default_swing_lookback() -> usize {
    50
}

fn default_discovery_interval_secs() -> u64 {
    300
}

fn default_analysis_interval_secs() -> u64 {
    60
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the radar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Discovery ----------------------------------------------------------

    /// Stats/delta interval requested from the agent API (e.g. `_3Days`,
    /// `_7Days`).
    #[serde(default = "default_stats_interval")]
    pub stats_interval: String,

    /// How many ranked agents each scan keeps.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    // --- Market data --------------------------------------------------------

    /// Quote currency for OHLCV lookups.
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,

    /// Candles requested for the trend series (needs >= 200 for SMA200).
    #[serde(default = "default_trend_candle_limit")]
    pub trend_candle_limit: u32,

    /// Hours per trend candle.
    #[serde(default = "default_trend_aggregate_hours")]
    pub trend_aggregate_hours: u32,

    /// Candles requested for the momentum series (needs >= 26 for MACD).
    #[serde(default = "default_momentum_candle_limit")]
    pub momentum_candle_limit: u32,

    /// Hours per momentum candle.
    #[serde(default = "default_momentum_aggregate_hours")]
    pub momentum_aggregate_hours: u32,

    /// Trend-series bars scanned for swing highs/lows.
    #[serde(default = "default_swing_lookback")]
    pub swing_lookback: usize,

    // --- Cadence ------------------------------------------------------------

    /// Seconds between discovery scans (fetch + rank).
    #[serde(default = "default_discovery_interval_secs")]
    pub discovery_interval_secs: u64,

    /// Seconds between signal-analysis passes over the latest scan.
    #[serde(default = "default_analysis_interval_secs")]
    pub analysis_interval_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stats_interval: default_stats_interval(),
            top_k: default_top_k(),
            quote_currency: default_quote_currency(),
            trend_candle_limit: default_trend_candle_limit(),
            trend_aggregate_hours: default_trend_aggregate_hours(),
            momentum_candle_limit: default_momentum_candle_limit(),
            momentum_aggregate_hours: default_momentum_aggregate_hours(),
            swing_lookback: default_swing_lookback(),
            discovery_interval_secs: default_discovery_interval_secs(),
            analysis_interval_secs: default_analysis_interval_secs(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            stats_interval = %config.stats_interval,
            top_k = config.top_k,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.stats_interval, "_3Days");
        assert_eq!(cfg.top_k, 20);
        assert_eq!(cfg.quote_currency, "USD");
        assert_eq!(cfg.trend_candle_limit, 200);
        assert_eq!(cfg.trend_aggregate_hours, 4);
        assert_eq!(cfg.momentum_candle_limit, 100);
        assert_eq!(cfg.momentum_aggregate_hours, 1);
        assert_eq!(cfg.swing_lookback, 50);
        assert_eq!(cfg.discovery_interval_secs, 300);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.stats_interval, "_3Days");
        assert_eq!(cfg.top_k, 20);
        assert_eq!(cfg.analysis_interval_secs, 60);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "stats_interval": "_7Days", "top_k": 5 }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.stats_interval, "_7Days");
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.swing_lookback, 50);
        assert_eq!(cfg.quote_currency, "USD");
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = RuntimeConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.stats_interval, cfg2.stats_interval);
        assert_eq!(cfg.top_k, cfg2.top_k);
        assert_eq!(cfg.discovery_interval_secs, cfg2.discovery_interval_secs);
    }
}
