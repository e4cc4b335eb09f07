//! Per-key fixed-window request throttling.
//!
//! The server-side control behind the client's advisory lockout: a
//! bounded number of attempts per key (normally an email address) per
//! window, answered with HTTP 429 beyond the limit.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use alumnet_core::error::{AlumnetError, AlumnetResult};

/// Entry count above which lapsed windows are swept out. Keys are
/// client-supplied, so the map cannot be allowed to grow forever.
const SWEEP_THRESHOLD: usize = 1024;

pub struct FixedWindowThrottle {
    windows: DashMap<String, (DateTime<Utc>, u32)>,
    limit: u32,
    window: Duration,
}

impl FixedWindowThrottle {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
        }
    }

    /// Record an attempt for `key`; `RateLimited` once the window's
    /// budget is spent.
    pub fn check(&self, key: &str) -> AlumnetResult<()> {
        self.check_at(key, Utc::now())
    }

    fn check_at(&self, key: &str, now: DateTime<Utc>) -> AlumnetResult<()> {
        if self.windows.len() > SWEEP_THRESHOLD {
            self.evict_lapsed(now);
        }

        let key = key.trim().to_lowercase();
        let mut entry = self.windows.entry(key).or_insert((now, 0));
        let (started, count) = *entry;

        if now - started >= self.window {
            *entry = (now, 1);
            return Ok(());
        }
        if count >= self.limit {
            return Err(AlumnetError::RateLimited);
        }
        *entry = (started, count + 1);
        Ok(())
    }

    /// Drop every entry whose window has lapsed. A lapsed entry and a
    /// missing entry behave identically on the next check.
    fn evict_lapsed(&self, now: DateTime<Utc>) {
        self.windows
            .retain(|_, (started, _)| now - *started < self.window);
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
