use std::sync::Arc;
use governor::{RateLimiter, state::{NotKeyed, InMemoryState}, clock::DefaultClock};

use crate::services::feed::FeedClient;

pub type FeedLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub type AppState = (
    Arc<FeedClient>,
    Arc<FeedLimiter>,
);
