use axum::{
    extract::{State, Query},
    Json,
};
use chrono::Utc;

use super::error::ApiError;
use super::state::AppState;
use crate::services::battle::{pair_battles, seed_bracket, Battle, Bracket, DEFAULT_MAX_BATTLES};
use crate::services::scoring::{rank_curves, score_curves};
use crate::types::models::{BattleParams, Curve, LeaderboardParams, ScoredCurve};

async fn fetch_curves(state: &AppState) -> Result<Vec<Curve>, ApiError> {
    let (feed, rate_limiter) = state;
    rate_limiter.until_ready().await;
    feed.latest_curves()
        .await
        .map_err(|e| ApiError::FeedError(e.to_string()))
}

// Every request scores its own freshly fetched batch, so scores are only
// comparable within one response.
async fn fetch_scored(state: &AppState) -> Result<Vec<ScoredCurve>, ApiError> {
    let curves = fetch_curves(state).await?;
    Ok(score_curves(&curves, Utc::now().timestamp()))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<ScoredCurve>>, ApiError> {
    let scored = fetch_scored(&state).await?;
    let mut ranked = rank_curves(&scored, params.sort.unwrap_or_default());
    if let Some(limit) = params.limit {
        ranked.truncate(limit);
    }
    Ok(Json(ranked))
}

pub async fn get_battles(
    State(state): State<AppState>,
    Query(params): Query<BattleParams>,
) -> Result<Json<Vec<Battle>>, ApiError> {
    let scored = fetch_scored(&state).await?;
    let battles = pair_battles(&scored, params.max.unwrap_or(DEFAULT_MAX_BATTLES));
    Ok(Json(battles))
}

pub async fn get_bracket(State(state): State<AppState>) -> Result<Json<Bracket>, ApiError> {
    let scored = fetch_scored(&state).await?;
    Ok(Json(seed_bracket(&scored)))
}

pub async fn get_curves(State(state): State<AppState>) -> Result<Json<Vec<Curve>>, ApiError> {
    let curves = fetch_curves(&state).await?;
    Ok(Json(curves))
}
