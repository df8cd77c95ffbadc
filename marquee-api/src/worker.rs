use std::sync::Arc;
use std::time::Instant;

use marquee_store::FixedWindowRateLimiter;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

/// Periodically evict rate-limit windows that have elapsed.
pub async fn start_rate_limit_sweeper(limiter: Arc<FixedWindowRateLimiter>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_secs = every.as_secs(), "Rate limit sweeper started");

    loop {
        ticker.tick().await;
        let removed = limiter.sweep_expired(Instant::now());
        if removed > 0 {
            debug!(removed, remaining = limiter.tracked_keys(), "Swept expired rate limit windows");
        }
    }
}
