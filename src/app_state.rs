// =============================================================================
// Central Application State — Mindshare Radar
// =============================================================================
//
// Shared snapshot store for the two periodic loops: the discovery loop writes
// the latest ranked scan, the analysis loop reads it and writes per-symbol
// signal reports.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared collections.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::ranking::agent::RankedAgent;
use crate::runtime_config::RuntimeConfig;
use crate::ta::SignalReport;

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

/// A recorded error event.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Result of one completed discovery scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Stats interval the scan was run with.
    pub stats_interval: String,
    /// Top-k agents, `finalScore` descending.
    pub agents: Vec<RankedAgent>,
}

/// Full serialisable state of the radar, for logging and shutdown dumps.
#[derive(Debug, Clone, Serialize)]
pub struct RadarSnapshot {
    pub state_version: u64,
    pub server_time: i64,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanSnapshot>,
    pub reports: HashMap<String, SignalReport>,
    pub recent_errors: Vec<ErrorRecord>,
}

/// Central state shared across async tasks via `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, incremented on every
    /// meaningful mutation.
    pub state_version: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    /// Latest completed discovery scan.
    pub latest_scan: RwLock<Option<ScanSnapshot>>,

    /// Latest signal report per agent symbol.
    pub latest_reports: RwLock<HashMap<String, SignalReport>>,

    /// Capped ring of recent errors.
    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            runtime_config: Arc::new(RwLock::new(config)),
            latest_scan: RwLock::new(None),
            latest_reports: RwLock::new(HashMap::new()),
            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Store the result of a completed discovery scan.
    pub fn set_scan(&self, stats_interval: String, agents: Vec<RankedAgent>) {
        *self.latest_scan.write() = Some(ScanSnapshot {
            generated_at: Utc::now(),
            stats_interval,
            agents,
        });
        self.increment_version();
    }

    /// Store the latest signal report for `symbol`.
    pub fn set_report(&self, symbol: String, report: SignalReport) {
        self.latest_reports.write().insert(symbol, report);
        self.increment_version();
    }

    /// Record an error message.  The ring is capped at [`MAX_RECENT_ERRORS`];
    /// oldest entries are evicted first.
    pub fn push_error(&self, msg: String) {
        let record = ErrorRecord {
            message: msg,
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.remove(0);
        }

        self.increment_version();
    }

    /// Build a complete, serialisable snapshot of the radar state.
    pub fn build_snapshot(&self) -> RadarSnapshot {
        RadarSnapshot {
            state_version: self.current_state_version(),
            server_time: Utc::now().timestamp_millis(),
            uptime_secs: self.start_time.elapsed().as_secs(),
            scan: self.latest_scan.read().clone(),
            reports: self.latest_reports.read().clone(),
            recent_errors: self.recent_errors.read().clone(),
        }
    }
}
