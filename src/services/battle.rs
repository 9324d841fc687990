use serde::Serialize;

use crate::types::models::ScoredCurve;

// Cumulative volume at which a curve graduates off the bonding curve.
pub const GRADUATION_TARGET_ETH: f64 = 4.0;
pub const DEFAULT_MAX_BATTLES: usize = 2;
pub const BRACKET_SIZE: usize = 8;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSide {
    pub token: String,
    pub name: String,
    pub symbol: String,
    pub score: f64,
    pub volume_eth: f64,
    pub health: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Battle {
    pub id: usize,
    pub coin_a: BattleSide,
    pub coin_b: BattleSide,
    pub pot_eth: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketSeed {
    pub seed: usize,
    pub token: String,
    pub name: String,
    pub symbol: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub id: String,
    pub coin_a: Option<BracketSeed>,
    pub coin_b: Option<BracketSeed>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub quarter_finals: Vec<Matchup>,
    pub semi_finals: Vec<Matchup>,
    pub grand_final: Matchup,
}

/// Bonding-curve progress as a 0-100 health bar: graduated curves are
/// full, the rest scale with volume toward the graduation target.
pub fn curve_health(curve: &ScoredCurve) -> u32 {
    if curve.curve.graduated {
        return 100;
    }
    let progress = (curve.volume_eth / GRADUATION_TARGET_ETH * 100.0).min(100.0);
    progress.round() as u32
}

fn live_by_score(scored: &[ScoredCurve]) -> Vec<&ScoredCurve> {
    let mut live: Vec<&ScoredCurve> = scored
        .iter()
        .filter(|c| !c.is_dead && c.volume_eth > 0.0)
        .collect();
    live.sort_by(|a, b| b.score.total_cmp(&a.score));
    live
}

fn side(curve: &ScoredCurve) -> BattleSide {
    BattleSide {
        token: curve.curve.token.clone(),
        name: curve.curve.name.clone(),
        symbol: curve.curve.symbol.clone(),
        score: curve.score,
        volume_eth: curve.volume_eth,
        health: curve_health(curve),
    }
}

/// Pair the top live curves into head-to-head battles: rank 1 vs rank 2,
/// rank 3 vs rank 4, and so on. A leftover unpaired curve is dropped.
pub fn pair_battles(scored: &[ScoredCurve], max_battles: usize) -> Vec<Battle> {
    let mut live = live_by_score(scored);
    live.truncate(max_battles * 2);

    live.chunks_exact(2)
        .enumerate()
        .map(|(id, pair)| Battle {
            id,
            coin_a: side(pair[0]),
            coin_b: side(pair[1]),
            pot_eth: pair[0].volume_eth + pair[1].volume_eth,
        })
        .collect()
}

/// Seed an 8-slot single-elimination bracket from the top live curves.
/// Quarter-finals pair adjacent seeds; later rounds stay unresolved since
/// winners are decided by bets settled on-chain. A short field leaves the
/// trailing slots as byes.
pub fn seed_bracket(scored: &[ScoredCurve]) -> Bracket {
    let mut live = live_by_score(scored);
    live.truncate(BRACKET_SIZE);

    let seeds: Vec<BracketSeed> = live
        .iter()
        .enumerate()
        .map(|(i, c)| BracketSeed {
            seed: i + 1,
            token: c.curve.token.clone(),
            name: c.curve.name.clone(),
            symbol: c.curve.symbol.clone(),
            score: c.score,
        })
        .collect();

    let quarter_finals = (0..BRACKET_SIZE / 2)
        .map(|i| Matchup {
            id: format!("qf{}", i + 1),
            coin_a: seeds.get(i * 2).cloned(),
            coin_b: seeds.get(i * 2 + 1).cloned(),
        })
        .collect();

    let semi_finals = (0..BRACKET_SIZE / 4)
        .map(|i| Matchup {
            id: format!("sf{}", i + 1),
            coin_a: None,
            coin_b: None,
        })
        .collect();

    Bracket {
        quarter_finals,
        semi_finals,
        grand_final: Matchup {
            id: "final".to_string(),
            coin_a: None,
            coin_b: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::score_curves;
    use crate::types::models::Curve;

    const NOW: i64 = 1_700_000_000;

    fn curve(id: &str, trade_count: &str, volume_eth: &str, last_trade_at: Option<i64>) -> Curve {
        Curve {
            id: id.to_string(),
            created_at: (NOW - 3600).to_string(),
            token: format!("0xtoken{id}"),
            name: format!("Coin {id}"),
            symbol: id.to_uppercase(),
            uri: format!("ipfs://{id}"),
            creator: "0xcreator".to_string(),
            graduated: false,
            last_price_usd: "0.000001".to_string(),
            last_price_eth: "0.0000004".to_string(),
            total_volume_eth: volume_eth.to_string(),
            trade_count: trade_count.to_string(),
            last_trade_at: last_trade_at.map(|t| t.to_string()),
        }
    }

    fn scored_set() -> Vec<ScoredCurve> {
        score_curves(
            &[
                curve("a", "120", "6.0", Some(NOW - 30)),
                curve("b", "60", "3.0", Some(NOW - 60)),
                curve("c", "30", "1.5", Some(NOW - 90)),
                curve("d", "10", "0.8", Some(NOW - 120)),
                curve("dead", "500", "50.0", Some(NOW - 8 * 3600)),
                curve("silent", "0", "0", Some(NOW - 60)),
            ],
            NOW,
        )
    }

    #[test]
    fn battles_pair_top_curves_by_score() {
        let battles = pair_battles(&scored_set(), 2);
        assert_eq!(battles.len(), 2);
        assert_eq!(battles[0].coin_a.symbol, "A");
        assert_eq!(battles[0].coin_b.symbol, "B");
        assert_eq!(battles[1].coin_a.symbol, "C");
        assert_eq!(battles[1].coin_b.symbol, "D");
        assert!((battles[0].pot_eth - 9.0).abs() < 1e-9);
    }

    #[test]
    fn battles_skip_dead_and_zero_volume_curves() {
        for battle in pair_battles(&scored_set(), 3) {
            for symbol in [&battle.coin_a.symbol, &battle.coin_b.symbol] {
                assert_ne!(symbol, "DEAD");
                assert_ne!(symbol, "SILENT");
            }
        }
    }

    #[test]
    fn unpaired_leftover_is_dropped() {
        let scored = score_curves(
            &[
                curve("a", "120", "6.0", Some(NOW - 30)),
                curve("b", "60", "3.0", Some(NOW - 60)),
                curve("c", "30", "1.5", Some(NOW - 90)),
            ],
            NOW,
        );
        let battles = pair_battles(&scored, 2);
        assert_eq!(battles.len(), 1);
    }

    #[test]
    fn health_tracks_graduation_progress() {
        let scored = score_curves(
            &[
                curve("half", "10", "2.0", Some(NOW - 30)),
                curve("over", "10", "9.0", Some(NOW - 30)),
            ],
            NOW,
        );
        assert_eq!(curve_health(&scored[0]), 50);
        assert_eq!(curve_health(&scored[1]), 100);

        let mut graduated = curve("grad", "1", "0.1", Some(NOW - 30));
        graduated.graduated = true;
        let scored = score_curves(&[graduated], NOW);
        assert_eq!(curve_health(&scored[0]), 100);
    }

    #[test]
    fn bracket_seeds_in_score_order() {
        let bracket = seed_bracket(&scored_set());
        assert_eq!(bracket.quarter_finals.len(), 4);
        assert_eq!(bracket.semi_finals.len(), 2);

        let qf1 = &bracket.quarter_finals[0];
        assert_eq!(qf1.id, "qf1");
        assert_eq!(qf1.coin_a.as_ref().unwrap().seed, 1);
        assert_eq!(qf1.coin_a.as_ref().unwrap().symbol, "A");
        assert_eq!(qf1.coin_b.as_ref().unwrap().seed, 2);

        // Later rounds are unresolved until bets settle.
        assert!(bracket.semi_finals[0].coin_a.is_none());
        assert!(bracket.grand_final.coin_a.is_none());
    }

    #[test]
    fn short_field_leaves_byes() {
        let scored = score_curves(
            &[
                curve("a", "120", "6.0", Some(NOW - 30)),
                curve("b", "60", "3.0", Some(NOW - 60)),
                curve("c", "30", "1.5", Some(NOW - 90)),
            ],
            NOW,
        );
        let bracket = seed_bracket(&scored);
        assert!(bracket.quarter_finals[0].coin_a.is_some());
        assert!(bracket.quarter_finals[0].coin_b.is_some());
        assert!(bracket.quarter_finals[1].coin_a.is_some());
        assert!(bracket.quarter_finals[1].coin_b.is_none());
        assert!(bracket.quarter_finals[2].coin_a.is_none());
        assert!(bracket.quarter_finals[3].coin_b.is_none());
    }
}
