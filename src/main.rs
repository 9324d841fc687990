use std::net::SocketAddr;
use anyhow::Result;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use tower_http::cors::CorsLayer;

mod types;
mod services;
mod api;

use crate::api::routes::create_router;
use crate::services::feed::FeedClient;
use crate::services::monitor;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    dotenv().ok();

    let feed_limiter = Arc::new(RateLimiter::direct(Quota::per_second(nonzero!(2u32))));
    let feed = Arc::new(FeedClient::from_env());

    // Probe the subgraph at startup
    match feed.latest_curves().await {
        Ok(curves) => tracing::info!(
            "Connected to subgraph at {} ({} curves)",
            feed.url(),
            curves.len()
        ),
        Err(e) => tracing::error!("Failed to reach subgraph: {:?}", e),
    };

    let state = (feed.clone(), feed_limiter.clone());
    let app = create_router(state).layer(CorsLayer::permissive());

    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    // Start the leaderboard monitor in a separate task
    let monitor_handle = tokio::spawn({
        let feed = feed.clone();
        let rate_limiter = feed_limiter.clone();
        async move {
            monitor::start_monitoring(feed, rate_limiter).await;
        }
    });

    // Run the API server and the monitor concurrently
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            if let Err(e) = result {
                tracing::error!("Failed to serve API: {:?}", e);
            }
        }
        _ = monitor_handle => {
            tracing::info!("Monitor service finished");
        }
    }

    Ok(())
}
