use axum::{
    routing::get,
    Router,
};
use super::handlers::{get_battles, get_bracket, get_curves, get_leaderboard};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/leaderboard", get(get_leaderboard))
        .route("/battles", get(get_battles))
        .route("/bracket", get(get_bracket))
        .route("/curves", get(get_curves))
        .with_state(state)
}
