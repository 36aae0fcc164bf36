// ABOUTME: Fixed-window rate limiter keyed by (credential, route).
// ABOUTME: Default policy is 10 requests per 60-second window; stale windows are swept on check.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Window {
    started: Instant,
    count: u32,
}

/// Per-credential, per-route fixed-window counter.
///
/// Exceeding the quota is terminal for that request; nothing here retries
/// or queues. Windows reset when their start falls out of the period, and
/// entries idle for two full periods are dropped during checks.
pub struct RateLimiter {
    limit: u32,
    period: Duration,
    windows: Mutex<HashMap<(String, String), Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, period: Duration) -> Self {
        Self {
            limit,
            period,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// The documented default quota: 10 requests per 60 seconds.
    pub fn default_policy() -> Self {
        Self::new(10, Duration::from_secs(60))
    }

    /// Records one request for the credential/route pair and returns
    /// whether it is within quota.
    pub fn check(&self, credential: &str, route: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();

        windows.retain(|_, w| now.duration_since(w.started) < self.period * 2);

        let window = windows
            .entry((credential.to_string(), route.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
            });
        if now.duration_since(window.started) >= self.period {
            window.started = now;
            window.count = 0;
        }
        window.count += 1;
        window.count <= self.limit
    }
}
