// =============================================================================
// Mindshare Radar — Main Entry Point
// =============================================================================
//
// Two periodic loops over shared state:
//   - Discovery: fetch the full agent list, rank it, store the top-k.
//   - Analysis:  run the technical signal engine over each ranked agent's
//     candle history and store the reports.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod app_state;
mod indicators;
mod ranking;
mod runtime_config;
mod sources;
mod stats;
mod ta;
mod types;

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::ranking::rank_top_agents;
use crate::runtime_config::RuntimeConfig;
use crate::sources::cookie::CookieClient;
use crate::sources::cryptocompare::CryptoCompareClient;
use crate::ta::AnalysisError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Mindshare Radar — Starting Up                    ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config = RuntimeConfig::load("runtime_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    info!(
        stats_interval = %config.stats_interval,
        top_k = config.top_k,
        discovery_interval_secs = config.discovery_interval_secs,
        analysis_interval_secs = config.analysis_interval_secs,
        "Radar configured"
    );

    // ── 2. Shared state & clients ────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    let cookie_key = std::env::var("COOKIE_API_KEY").unwrap_or_default();
    if cookie_key.is_empty() {
        warn!("COOKIE_API_KEY is not set — agent discovery will fail");
    }
    let cookie_client = Arc::new(CookieClient::new(cookie_key));

    let cc_key = std::env::var("CRYPTOCOMPARE_API_KEY").unwrap_or_default();
    let cc_client = Arc::new(CryptoCompareClient::new(cc_key));

    // ── 3. Discovery loop (fetch + rank) ─────────────────────────────────
    let disco_state = state.clone();
    let disco_cookie = cookie_client.clone();
    tokio::spawn(async move {
        let period = disco_state.runtime_config.read().discovery_interval_secs;
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(period));

        loop {
            interval.tick().await;

            let (stats_interval, top_k) = {
                let cfg = disco_state.runtime_config.read();
                (cfg.stats_interval.clone(), cfg.top_k)
            };

            info!(stats_interval = %stats_interval, "discovery scan starting");

            match disco_cookie.get_all_agents(&stats_interval).await {
                Ok(agents) => {
                    let fetched = agents.len();
                    let ranked = rank_top_agents(agents, top_k);

                    for (i, r) in ranked.iter().take(5).enumerate() {
                        info!(
                            rank = i + 1,
                            agent = %r.agent.agent_name,
                            final_score = format!("{:.4}", r.final_score),
                            market_cap = r.agent.market_cap,
                            "top agent"
                        );
                    }

                    info!(fetched, ranked = ranked.len(), "discovery scan complete");
                    disco_state.set_scan(stats_interval, ranked);
                }
                Err(e) => {
                    error!(error = %e, "discovery scan failed");
                    disco_state.push_error(format!("discovery scan failed: {e}"));
                }
            }
        }
    });

    // ── 4. Analysis loop (signal engine over the latest scan) ────────────
    let analysis_state = state.clone();
    let analysis_cc = cc_client.clone();
    tokio::spawn(async move {
        let period = analysis_state.runtime_config.read().analysis_interval_secs;
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(period));

        loop {
            interval.tick().await;

            let Some(scan) = analysis_state.latest_scan.read().clone() else {
                debug!("no discovery scan yet — skipping analysis pass");
                continue;
            };

            let cfg = analysis_state.runtime_config.read().clone();

            for ranked in &scan.agents {
                let symbol = ranked.agent.agent_name.trim().to_string();
                if symbol.is_empty() {
                    continue;
                }

                let trend = match analysis_cc
                    .histo_hour(
                        &symbol,
                        &cfg.quote_currency,
                        cfg.trend_candle_limit,
                        cfg.trend_aggregate_hours,
                    )
                    .await
                {
                    Ok(c) => c,
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "trend candle fetch failed");
                        analysis_state.push_error(format!("{symbol}: trend fetch failed: {e}"));
                        continue;
                    }
                };

                let momentum = match analysis_cc
                    .histo_hour(
                        &symbol,
                        &cfg.quote_currency,
                        cfg.momentum_candle_limit,
                        cfg.momentum_aggregate_hours,
                    )
                    .await
                {
                    Ok(c) => c,
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "momentum candle fetch failed");
                        analysis_state.push_error(format!("{symbol}: momentum fetch failed: {e}"));
                        continue;
                    }
                };

                match ta::analyze(&trend, &momentum, cfg.swing_lookback) {
                    Ok(report) => {
                        info!(
                            symbol = %symbol,
                            recommendation = %report.recommendation,
                            score = report.overall_score,
                            "signal analysis complete"
                        );
                        analysis_state.set_report(symbol, report);
                    }
                    Err(e @ AnalysisError::InsufficientData { .. }) => {
                        // Not enough listed history for this token — skip it,
                        // don't retry with the same data.
                        debug!(symbol = %symbol, error = %e, "skipping symbol");
                    }
                }
            }
        }
    });

    info!("All loops running. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");

    if let Err(e) = state.runtime_config.read().save("runtime_config.json") {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    // Dump the final state for post-mortem inspection.
    match serde_json::to_string_pretty(&state.build_snapshot()) {
        Ok(json) => {
            if let Err(e) = std::fs::write("radar_snapshot.json", json) {
                error!(error = %e, "Failed to write radar snapshot on shutdown");
            }
        }
        Err(e) => error!(error = %e, "Failed to serialise radar snapshot"),
    }

    info!("Mindshare Radar shut down complete.");
    Ok(())
}
