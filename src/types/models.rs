use serde::{Deserialize, Serialize};

/// Raw bonding-curve record as returned by the subgraph. Numeric fields
/// arrive as decimal strings to preserve precision across the boundary;
/// `last_trade_at` is None for curves that never traded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    pub id: String,
    pub created_at: String,
    pub token: String,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub creator: String,
    pub graduated: bool,
    pub last_price_usd: String,
    pub last_price_eth: String,
    pub total_volume_eth: String,
    pub trade_count: String,
    #[serde(default)]
    pub last_trade_at: Option<String>,
}

/// A curve with derived metrics for one scoring pass. Scores are
/// batch-relative (min/max normalized per call), so they are only
/// comparable within the batch they were computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCurve {
    #[serde(flatten)]
    pub curve: Curve,
    pub score: f64,
    pub velocity: f64,
    pub estimated_mc_usd: f64,
    pub volume_eth: f64,
    pub trades: f64,
    pub is_hot: bool,
    pub is_dead: bool,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Hot,
    Rising,
    Active,
    Dead,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Score,
    Volume,
    Velocity,
    Marketcap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardParams {
    pub sort: Option<SortMode>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BattleParams {
    pub max: Option<usize>,
}
