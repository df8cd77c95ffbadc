use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter per client key.
///
/// A window opens on the first request and admits `max_requests` until it elapses; the
/// next request after that opens a fresh window. Expired records are dropped by
/// [`sweep_expired`](Self::sweep_expired).
#[derive(Default)]
pub struct FixedWindowRateLimiter {
    windows: DashMap<String, WindowRecord>,
}

impl FixedWindowRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request for `key`. Returns `false` when the window is already full.
    pub fn check_rate_limit(&self, key: &str, max_requests: u32, window: Duration) -> bool {
        self.check_at(key, max_requests, window, Instant::now())
    }

    pub fn check_at(&self, key: &str, max_requests: u32, window: Duration, now: Instant) -> bool {
        let mut record = self.windows.entry(key.to_string()).or_insert(WindowRecord {
            count: 0,
            reset_at: now + window,
        });

        if now > record.reset_at {
            record.count = 0;
            record.reset_at = now + window;
        }

        if record.count >= max_requests {
            return false;
        }

        record.count += 1;
        true
    }

    /// Drop every record whose window has elapsed at `now`. Returns how many were removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, record| now <= record.reset_at);
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
