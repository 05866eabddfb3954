// =============================================================================
// Agent Ranking Engine
// =============================================================================
//
// Ranks agent tokens by a composite attention/momentum score:
//
//   (1) Filter out agents at or below the market-cap floor.
//   (2) Population averages of the three metric-to-cap ratios.
//   (3) Per-agent raw scores: ratio scores vs the averages, delta sum.
//   (4) Cross-population robust normalization of every component.
//   (5) Weighted composite `finalScore`; sort descending, take top-k.
//
// Normalization is population-relative: every agent of one batch must be
// visible to a single call.  Splitting a batch across calls silently changes
// the min/percentile baselines and therefore the scores.
// =============================================================================

pub mod agent;

use tracing::debug;

use crate::ranking::agent::{AgentRecord, RankedAgent};
use crate::stats::{log_robust_normalize, ratio, ratio_score, robust_normalize};

// =============================================================================
// Engine constants — calibrated design choices, fixed by contract
// =============================================================================

/// Agents at or below this market cap never enter scoring.
pub const MIN_MARKET_CAP: f64 = 100_000.0;

/// Component weights of the composite score.  Mindshare delta and the
/// mindshare ratio score dominate; volume and holder ratios are secondary;
/// market cap is a mild tie-breaker.
const VOLUME_DELTA_WEIGHT: f64 = 0.3;
const SF_SCORE_WEIGHT: f64 = 0.5;
const HC_SCORE_WEIGHT: f64 = 0.2;
const MARKET_CAP_WEIGHT: f64 = 0.2;
const COMPONENT_DIVISOR: f64 = 3.0;

// =============================================================================
// Population averages
// =============================================================================

/// Population-wide average metric-to-cap ratios, computed once per batch.
///
/// An average is `None` when no agent in the batch has a defined ratio for
/// that metric (all zero denominators).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationAverages {
    pub mindshare: Option<f64>,
    pub smart_followers: Option<f64>,
    pub holders: Option<f64>,
}

impl PopulationAverages {
    pub fn compute(agents: &[AgentRecord]) -> Self {
        Self {
            mindshare: average_ratio(agents, |a| a.mindshare),
            smart_followers: average_ratio(agents, |a| a.smart_followers_count as f64),
            holders: average_ratio(agents, |a| a.holders_count as f64),
        }
    }
}

fn average_ratio(agents: &[AgentRecord], metric: impl Fn(&AgentRecord) -> f64) -> Option<f64> {
    let ratios: Vec<f64> = agents
        .iter()
        .filter_map(|a| ratio(a.market_cap, metric(a)))
        .collect();

    if ratios.is_empty() {
        None
    } else {
        Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
    }
}

// =============================================================================
// Ranking pipeline
// =============================================================================

/// Per-agent raw scores before normalization.
struct RawScores {
    ms_ratio_score: f64,
    sf_ratio_score: f64,
    hc_ratio_score: f64,
    score_delta: f64,
    pe_adjustment_score: f64,
    market_cap_log: f64,
}

/// Score and rank `agents`, returning the top `k` by `finalScore` descending.
///
/// Ties keep their original order (stable sort).  An empty input, or one that
/// filters down to nothing, returns an empty vec — never an error.  A
/// population of one is an accepted degenerate case: every normalized
/// component resolves to 0, so its `finalScore` is 0.
pub fn rank_top_agents(agents: Vec<AgentRecord>, k: usize) -> Vec<RankedAgent> {
    let total = agents.len();

    // --- (1) Market-cap floor --------------------------------------------
    let agents: Vec<AgentRecord> = agents
        .into_iter()
        .filter(|a| a.market_cap > MIN_MARKET_CAP)
        .collect();

    debug!(
        total,
        surviving = agents.len(),
        "ranking pass: market-cap filter applied"
    );

    if agents.is_empty() {
        return Vec::new();
    }

    // --- (2) Population averages -----------------------------------------
    let averages = PopulationAverages::compute(&agents);

    // --- (3) Raw per-agent scores ----------------------------------------
    let raw: Vec<RawScores> = agents.iter().map(|a| raw_scores(a, &averages)).collect();

    // --- (4) Population vectors for normalization ------------------------
    let mindshare_deltas: Vec<f64> = agents.iter().map(|a| a.mindshare_delta_percent).collect();
    let volume_deltas: Vec<f64> = agents
        .iter()
        .map(|a| a.volume_24_hours_delta_percent)
        .collect();
    let ms_scores: Vec<f64> = raw.iter().map(|r| r.ms_ratio_score).collect();
    let sf_scores: Vec<f64> = raw.iter().map(|r| r.sf_ratio_score).collect();
    let hc_scores: Vec<f64> = raw.iter().map(|r| r.hc_ratio_score).collect();
    let cap_logs: Vec<f64> = raw.iter().map(|r| r.market_cap_log).collect();

    // --- (5) Normalize and combine ---------------------------------------
    let mut ranked: Vec<RankedAgent> = agents
        .into_iter()
        .zip(raw)
        .map(|(agent, r)| {
            let norm_mindshare_delta =
                robust_normalize(agent.mindshare_delta_percent, &mindshare_deltas);
            let norm_volume_delta =
                robust_normalize(agent.volume_24_hours_delta_percent, &volume_deltas);
            let norm_ms_ratio_score = log_robust_normalize(r.ms_ratio_score, &ms_scores);
            let norm_sf_ratio_score = log_robust_normalize(r.sf_ratio_score, &sf_scores);
            let norm_hc_ratio_score = log_robust_normalize(r.hc_ratio_score, &hc_scores);
            let norm_market_cap =
                robust_normalize(r.market_cap_log, &cap_logs) * MARKET_CAP_WEIGHT;

            let final_score = (norm_mindshare_delta
                + norm_volume_delta * VOLUME_DELTA_WEIGHT
                + norm_ms_ratio_score
                + norm_sf_ratio_score * SF_SCORE_WEIGHT
                + norm_hc_ratio_score * HC_SCORE_WEIGHT
                + norm_market_cap)
                / COMPONENT_DIVISOR;

            RankedAgent {
                agent,
                ms_ratio_score: r.ms_ratio_score,
                sf_ratio_score: r.sf_ratio_score,
                hc_ratio_score: r.hc_ratio_score,
                score_delta: r.score_delta,
                pe_adjustment_score: r.pe_adjustment_score,
                raw_final_score: r.score_delta + r.pe_adjustment_score,
                norm_mindshare_delta,
                norm_volume_delta,
                norm_ms_ratio_score,
                norm_sf_ratio_score,
                norm_hc_ratio_score,
                final_score,
            }
        })
        .collect();

    // --- (6) Rank ---------------------------------------------------------
    // Stable sort: equal scores keep their original order.
    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);

    debug!(returned = ranked.len(), "ranking pass complete");
    ranked
}

fn raw_scores(agent: &AgentRecord, averages: &PopulationAverages) -> RawScores {
    let ms = ratio_score(averages.mindshare, agent.mindshare, agent.market_cap);
    let sf = ratio_score(
        averages.smart_followers,
        agent.smart_followers_count as f64,
        agent.market_cap,
    );
    let hc = ratio_score(
        averages.holders,
        agent.holders_count as f64,
        agent.market_cap,
    );

    let defined: Vec<f64> = [ms, sf, hc].iter().flatten().copied().collect();
    let pe_adjustment_score = if defined.is_empty() {
        0.0
    } else {
        defined.iter().sum::<f64>() / defined.len() as f64
    };

    RawScores {
        ms_ratio_score: ms.unwrap_or(0.0),
        sf_ratio_score: sf.unwrap_or(0.0),
        hc_ratio_score: hc.unwrap_or(0.0),
        score_delta: agent.mindshare_delta_percent + agent.volume_24_hours_delta_percent,
        pe_adjustment_score,
        // Log-compress market cap for the tie-breaker component; a missing
        // (zero) cap reads as log 0.
        market_cap_log: if agent.market_cap > 0.0 {
            agent.market_cap.ln()
        } else {
            0.0
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn agent(
        name: &str,
        market_cap: f64,
        mindshare: f64,
        sf: u64,
        hc: u64,
        ms_delta: f64,
        vol_delta: f64,
    ) -> AgentRecord {
        AgentRecord {
            agent_name: name.to_string(),
            market_cap,
            mindshare,
            smart_followers_count: sf,
            holders_count: hc,
            mindshare_delta_percent: ms_delta,
            volume_24_hours_delta_percent: vol_delta,
            ..AgentRecord::default()
        }
    }

    // ---- filtering -------------------------------------------------------

    #[test]
    fn empty_input_returns_empty() {
        assert!(rank_top_agents(Vec::new(), 10).is_empty());
    }

    #[test]
    fn market_cap_floor_is_exclusive() {
        let agents = vec![
            agent("at-floor", 100_000.0, 5.0, 100, 100, 1.0, 1.0),
            agent("below", 50_000.0, 5.0, 100, 100, 1.0, 1.0),
            agent("above", 100_001.0, 5.0, 100, 100, 1.0, 1.0),
        ];
        let ranked = rank_top_agents(agents, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].agent.agent_name, "above");
    }

    // ---- population averages --------------------------------------------

    #[test]
    fn averages_skip_undefined_ratios() {
        let agents = vec![
            agent("a", 1_000_000.0, 10.0, 0, 100, 0.0, 0.0),
            agent("b", 2_000_000.0, 0.0, 0, 200, 0.0, 0.0),
        ];
        let avg = PopulationAverages::compute(&agents);
        // Only agent "a" has mindshare: 1_000_000 / 10.
        assert_eq!(avg.mindshare, Some(100_000.0));
        // No agent has smart followers.
        assert_eq!(avg.smart_followers, None);
        // Both have holders: (10_000 + 10_000) / 2.
        assert_eq!(avg.holders, Some(10_000.0));
    }

    // ---- degenerate populations -----------------------------------------

    #[test]
    fn single_agent_population_scores_zero() {
        let ranked = rank_top_agents(
            vec![agent("solo", 5_000_000.0, 12.0, 500, 2_000, 40.0, 15.0)],
            5,
        );
        assert_eq!(ranked.len(), 1);
        // Every normalized component degenerates to 0 (min == 99th pct).
        assert_eq!(ranked[0].final_score, 0.0);
        // Raw scores are still populated for inspection.
        assert!((ranked[0].score_delta - 55.0).abs() < 1e-12);
        assert!((ranked[0].ms_ratio_score - 1.0).abs() < 1e-12);
        assert!((ranked[0].raw_final_score - 56.0).abs() < 1e-12);
    }

    // ---- ordering & top-k ------------------------------------------------

    #[test]
    fn results_sorted_descending_and_truncated() {
        let agents = vec![
            agent("laggard", 900_000.0, 1.0, 10, 50, -10.0, -10.0),
            agent("leader", 200_000.0, 100.0, 5_000, 9_000, 80.0, 60.0),
            agent("middle", 400_000.0, 10.0, 500, 900, 5.0, 5.0),
            agent("fourth", 600_000.0, 5.0, 100, 400, 0.0, 2.0),
        ];
        let ranked = rank_top_agents(agents, 3);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].agent.agent_name, "leader");
        for pair in ranked.windows(2) {
            assert!(
                pair[0].final_score >= pair[1].final_score,
                "not sorted: {} < {}",
                pair[0].final_score,
                pair[1].final_score
            );
        }
    }

    #[test]
    fn k_larger_than_population_returns_all() {
        let agents = vec![
            agent("a", 200_000.0, 1.0, 10, 10, 0.0, 0.0),
            agent("b", 300_000.0, 2.0, 20, 20, 1.0, 1.0),
        ];
        assert_eq!(rank_top_agents(agents, 50).len(), 2);
    }

    #[test]
    fn ties_keep_original_order() {
        // Identical agents score identically; the stable sort preserves
        // input order.
        let a = agent("first", 500_000.0, 10.0, 100, 100, 5.0, 5.0);
        let mut b = a.clone();
        b.agent_name = "second".to_string();
        let ranked = rank_top_agents(vec![a, b], 10);

        assert_eq!(ranked[0].agent.agent_name, "first");
        assert_eq!(ranked[1].agent.agent_name, "second");
        assert_eq!(ranked[0].final_score, ranked[1].final_score);
    }

    // ---- score plumbing --------------------------------------------------

    #[test]
    fn ratio_scores_relative_to_population_average() {
        // Two agents, same cap; "efficient" carries twice the mindshare, so
        // its cap-per-mindshare ratio is half the average's... precisely:
        // ratios are 100k and 200k, average 150k.
        let agents = vec![
            agent("efficient", 1_000_000.0, 10.0, 0, 0, 0.0, 0.0),
            agent("diluted", 1_000_000.0, 5.0, 0, 0, 0.0, 0.0),
        ];
        let ranked = rank_top_agents(agents, 10);
        let by_name = |n: &str| {
            ranked
                .iter()
                .find(|r| r.agent.agent_name == n)
                .unwrap()
                .clone()
        };

        // efficient: 150k / 100k = 1.5; diluted: 150k / 200k = 0.75.
        assert!((by_name("efficient").ms_ratio_score - 1.5).abs() < 1e-12);
        assert!((by_name("diluted").ms_ratio_score - 0.75).abs() < 1e-12);
        // Undefined sf/hc ratios are stored as 0.
        assert_eq!(by_name("efficient").sf_ratio_score, 0.0);
        // pe adjustment averages only the defined scores.
        assert!((by_name("efficient").pe_adjustment_score - 1.5).abs() < 1e-12);
    }
}
