use crate::types::models::{Curve, ScoredCurve, SortMode, Tier};

// Assumed total supply for market-cap estimation; no real supply feed exists.
pub const ASSUMED_SUPPLY: f64 = 1_000_000_000.0;

const RECENCY_WINDOW_HOURS: f64 = 1.0;
const DEAD_AFTER_HOURS: f64 = 6.0;
const HOT_MIN_VELOCITY: f64 = 5.0;
const HOT_MIN_VOLUME_ETH: f64 = 0.5;
const RISING_MIN_VELOCITY: f64 = 1.0;
const RISING_MIN_VOLUME_ETH: f64 = 0.1;

const VELOCITY_WEIGHT: f64 = 0.4;
const VOLUME_WEIGHT: f64 = 0.3;
const TRADES_WEIGHT: f64 = 0.2;
const RECENCY_WEIGHT: f64 = 0.1;

/// Coerce a decimal string from the feed to f64. Malformed or non-finite
/// values degrade to 0 rather than failing the batch.
fn parse_metric(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_timestamp(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

/// Trading velocity: trades per hour since creation. 0 when the curve is
/// not older than `now` (clock skew, not-yet-visible timestamps).
pub fn velocity(curve: &Curve, now: i64) -> f64 {
    let age_hours = (now - parse_timestamp(&curve.created_at)) as f64 / 3600.0;
    if age_hours <= 0.0 {
        return 0.0;
    }
    parse_metric(&curve.trade_count) / age_hours
}

/// True iff the curve traded within the last `within_hours` hours.
pub fn recently_traded(curve: &Curve, now: i64, within_hours: f64) -> bool {
    match curve.last_trade_at.as_deref() {
        None => false,
        Some(ts) => (now - parse_timestamp(ts)) as f64 / 3600.0 <= within_hours,
    }
}

/// Tier classification from raw metrics, first match wins. Uses raw values
/// so a curve's tier never depends on what else is in the batch.
pub fn tier_for(velocity: f64, volume_eth: f64, last_trade_at: Option<&str>, now: i64) -> Tier {
    let hours_since_last_trade = match last_trade_at {
        Some(ts) => (now - parse_timestamp(ts)) as f64 / 3600.0,
        None => f64::INFINITY,
    };

    if hours_since_last_trade > DEAD_AFTER_HOURS {
        return Tier::Dead;
    }
    if velocity > HOT_MIN_VELOCITY && volume_eth > HOT_MIN_VOLUME_ETH {
        return Tier::Hot;
    }
    if velocity > RISING_MIN_VELOCITY || volume_eth > RISING_MIN_VOLUME_ETH {
        return Tier::Rising;
    }
    Tier::Active
}

/// Linear rescale to [0,1], clamped. A degenerate range (max == min,
/// including the single-curve batch) maps everything to 0.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

struct RawMetrics<'a> {
    curve: &'a Curve,
    velocity: f64,
    volume_eth: f64,
    trades: f64,
    estimated_mc_usd: f64,
    recently_traded: bool,
}

/// Score a batch of curves against itself. Weights: velocity 40%,
/// volume 30%, trades 20%, recency 10%. Output preserves input order;
/// ranking is a separate step.
pub fn score_curves(curves: &[Curve], now: i64) -> Vec<ScoredCurve> {
    let raw: Vec<RawMetrics> = curves
        .iter()
        .map(|c| RawMetrics {
            curve: c,
            velocity: velocity(c, now),
            volume_eth: parse_metric(&c.total_volume_eth),
            trades: parse_metric(&c.trade_count),
            estimated_mc_usd: parse_metric(&c.last_price_usd) * ASSUMED_SUPPLY,
            recently_traded: recently_traded(c, now, RECENCY_WINDOW_HOURS),
        })
        .collect();

    let (min_vel, max_vel) = min_max(raw.iter().map(|r| r.velocity));
    let (min_vol, max_vol) = min_max(raw.iter().map(|r| r.volume_eth));
    let (min_trades, max_trades) = min_max(raw.iter().map(|r| r.trades));

    raw.into_iter()
        .map(|r| {
            let norm_velocity = normalize(r.velocity, min_vel, max_vel);
            let norm_volume = normalize(r.volume_eth, min_vol, max_vol);
            let norm_trades = normalize(r.trades, min_trades, max_trades);
            let recency_bonus = if r.recently_traded { 1.0 } else { 0.0 };

            let score = norm_velocity * VELOCITY_WEIGHT
                + norm_volume * VOLUME_WEIGHT
                + norm_trades * TRADES_WEIGHT
                + recency_bonus * RECENCY_WEIGHT;

            let tier = tier_for(
                r.velocity,
                r.volume_eth,
                r.curve.last_trade_at.as_deref(),
                now,
            );

            ScoredCurve {
                curve: r.curve.clone(),
                score,
                velocity: r.velocity,
                estimated_mc_usd: r.estimated_mc_usd,
                volume_eth: r.volume_eth,
                trades: r.trades,
                is_hot: tier == Tier::Hot,
                is_dead: tier == Tier::Dead,
                tier,
            }
        })
        .collect()
}

fn sort_key(curve: &ScoredCurve, mode: SortMode) -> f64 {
    match mode {
        SortMode::Score => curve.score,
        SortMode::Volume => curve.volume_eth,
        SortMode::Velocity => curve.velocity,
        SortMode::Marketcap => curve.estimated_mc_usd,
    }
}

/// Rank scored curves descending by the chosen key. The sort is stable,
/// so equal keys keep their input order and ranking is idempotent.
pub fn rank_curves(scored: &[ScoredCurve], mode: SortMode) -> Vec<ScoredCurve> {
    let mut ranked = scored.to_vec();
    ranked.sort_by(|a, b| sort_key(b, mode).total_cmp(&sort_key(a, mode)));
    ranked
}
