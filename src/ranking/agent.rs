// =============================================================================
// Agent Records — typed schema for the agent discovery API
// =============================================================================
//
// The upstream API serves loosely-typed JSON objects.  Parsing happens once,
// here, into a fully-typed record with documented defaults (every numeric
// field falls back to 0), so the scoring engine never touches free-form maps.
//
// Derived scores live on a separate immutable `RankedAgent` built per ranking
// pass — input records are never mutated in place.
// =============================================================================

use serde::{Deserialize, Serialize};

/// One token contract an agent is deployed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default)]
    pub chain: i64,
    #[serde(default)]
    pub contract_address: String,
}

/// Raw agent record as served by the discovery API.
///
/// Missing optional fields default to zero/empty and never fail parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    #[serde(default)]
    pub agent_name: String,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub market_cap: f64,

    #[serde(default)]
    pub market_cap_delta_percent: f64,

    #[serde(default)]
    pub mindshare: f64,

    #[serde(default)]
    pub mindshare_delta_percent: f64,

    #[serde(default)]
    pub volume_24_hours: f64,

    #[serde(default)]
    pub volume_24_hours_delta_percent: f64,

    #[serde(default)]
    pub holders_count: u64,

    #[serde(default)]
    pub smart_followers_count: u64,

    #[serde(default)]
    pub followers_count: u64,

    #[serde(default)]
    pub contracts: Vec<Contract>,

    #[serde(default)]
    pub twitter_usernames: Vec<String>,
}

/// An agent together with every derived score from one ranking pass.
///
/// Field wire names mirror the upstream convention: derived raw scores stay
/// snake_case, normalized components carry the `norm_` prefix plus the source
/// field's camelCase name, and the composite score is `finalScore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAgent {
    #[serde(flatten)]
    pub agent: AgentRecord,

    pub ms_ratio_score: f64,
    pub sf_ratio_score: f64,
    pub hc_ratio_score: f64,

    /// Sum of the mindshare and 24h-volume delta percentages.
    pub score_delta: f64,

    /// Mean of the defined ratio scores (0 when none are defined).
    pub pe_adjustment_score: f64,

    /// `score_delta + pe_adjustment_score`.  Kept for inspection; the ranking
    /// itself uses the normalized composite below.
    pub raw_final_score: f64,

    #[serde(rename = "norm_mindshareDeltaPercent")]
    pub norm_mindshare_delta: f64,

    #[serde(rename = "norm_volume24HoursDeltaPercent")]
    pub norm_volume_delta: f64,

    pub norm_ms_ratio_score: f64,
    pub norm_sf_ratio_score: f64,
    pub norm_hc_ratio_score: f64,

    #[serde(rename = "finalScore")]
    pub final_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_record_parses_camel_case_with_defaults() {
        let json = r#"{
            "agentName": "测试 Agent",
            "marketCap": 1500000.5,
            "mindshare": 2.25,
            "holdersCount": 1200,
            "contracts": [{"chain": 8453, "contractAddress": "0xabc"}]
        }"#;
        let agent: AgentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(agent.agent_name, "测试 Agent");
        assert!((agent.market_cap - 1_500_000.5).abs() < 1e-9);
        assert_eq!(agent.holders_count, 1200);
        // Absent fields default to zero/empty.
        assert_eq!(agent.mindshare_delta_percent, 0.0);
        assert_eq!(agent.smart_followers_count, 0);
        assert!(agent.twitter_usernames.is_empty());
        assert_eq!(agent.contracts[0].contract_address, "0xabc");
    }

    #[test]
    fn ranked_agent_wire_names() {
        let ranked = RankedAgent {
            agent: AgentRecord {
                agent_name: "a".into(),
                market_cap: 200_000.0,
                ..AgentRecord::default()
            },
            ms_ratio_score: 1.0,
            sf_ratio_score: 0.0,
            hc_ratio_score: 0.0,
            score_delta: 5.0,
            pe_adjustment_score: 1.0,
            raw_final_score: 6.0,
            norm_mindshare_delta: 0.5,
            norm_volume_delta: 0.25,
            norm_ms_ratio_score: 1.0,
            norm_sf_ratio_score: 0.0,
            norm_hc_ratio_score: 0.0,
            final_score: 0.75,
        };

        let json = serde_json::to_value(&ranked).unwrap();
        assert!(json.get("finalScore").is_some());
        assert!(json.get("norm_mindshareDeltaPercent").is_some());
        assert!(json.get("norm_volume24HoursDeltaPercent").is_some());
        assert!(json.get("ms_ratio_score").is_some());
        // Flattened original fields keep their camelCase names.
        assert!(json.get("marketCap").is_some());
        assert!(json.get("agentName").is_some());
    }
}
