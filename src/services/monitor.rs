use std::sync::Arc;
use chrono::Utc;
use governor::{RateLimiter, state::{NotKeyed, InMemoryState}, clock::DefaultClock};
use tokio::time::Duration;

use crate::services::feed::FeedClient;
use crate::services::scoring::{rank_curves, score_curves};
use crate::types::models::{SortMode, Tier};

// Matches the front end's refresh cadence.
const POLL_INTERVAL_SECS: u64 = 5;

pub async fn start_monitoring(
    feed: Arc<FeedClient>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
) {
    tracing::info!("Starting leaderboard monitor ({}s interval)...", POLL_INTERVAL_SECS);
    let mut poll_timer = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));

    loop {
        poll_timer.tick().await;
        rate_limiter.until_ready().await;

        let curves = match feed.latest_curves().await {
            Ok(curves) => curves,
            Err(e) => {
                tracing::error!("Failed to fetch curves: {:?}", e);
                continue;
            }
        };

        if curves.is_empty() {
            tracing::warn!("Feed returned no curves");
            continue;
        }

        // Each tick scores its own fresh batch; nothing carries over.
        let scored = score_curves(&curves, Utc::now().timestamp());
        let ranked = rank_curves(&scored, SortMode::Score);

        let hot = ranked.iter().filter(|c| c.tier == Tier::Hot).count();
        let rising = ranked.iter().filter(|c| c.tier == Tier::Rising).count();
        let dead = ranked.iter().filter(|c| c.tier == Tier::Dead).count();

        if let Some(leader) = ranked.first() {
            tracing::info!(
                "Leader: {} ({}) score {:.3}, {:.1} trades/h, {:.2} ETH volume",
                leader.curve.name,
                leader.curve.symbol,
                leader.score,
                leader.velocity,
                leader.volume_eth
            );
        }
        tracing::info!(
            "Scored {} curves: {} hot, {} rising, {} dead",
            ranked.len(),
            hot,
            rising,
            dead
        );
    }
}
