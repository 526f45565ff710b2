//! Fixed-window counter store.
//!
//! One process-wide map from client key to counter state, exclusively owned
//! by the rate governor. The whole read-increment-write sequence for a key
//! runs under a single lock so the admit-at-most-max invariant holds when
//! request handlers run on OS threads in parallel.

use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::policy::RateLimitPolicy;

/// Mutable counter state for one client key.
#[derive(Debug, Clone)]
pub struct CounterEntry {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
}

/// Outcome of evaluating one request against a policy.
#[derive(Debug, Clone)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
    /// Whole seconds until the window resets, rounded up
    pub retry_after_secs: i64,
}

#[derive(Default)]
pub struct RateLimitStore {
    entries: Mutex<HashMap<String, CounterEntry>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `key` and decide whether it passes.
    ///
    /// Fixed-window semantics: an entry read at or past its reset time is
    /// replaced with a fresh window anchored at `now`. The request that
    /// pushes the count strictly over `policy.max` is the first one
    /// rejected; the max-th itself still passes.
    pub async fn check(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> RateDecision {
        let mut entries = self.entries.lock().await;
        let (count, reset_at) = match entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if now < entry.window_reset_at {
                    entry.count += 1;
                } else {
                    entry.count = 1;
                    entry.window_reset_at = now + policy.window;
                }
                (entry.count, entry.window_reset_at)
            }
            Entry::Vacant(vacant) => {
                let entry = vacant.insert(CounterEntry {
                    count: 1,
                    window_reset_at: now + policy.window,
                });
                (entry.count, entry.window_reset_at)
            }
        };
        drop(entries);

        let retry_after_ms = (reset_at - now).num_milliseconds().max(0);
        RateDecision {
            allowed: count <= policy.max,
            limit: policy.max,
            remaining: policy.max.saturating_sub(count),
            reset_at,
            retry_after_secs: (retry_after_ms + 999) / 1000,
        }
    }

    /// Undo one previously counted request, flooring at zero.
    ///
    /// Used by policies with `skip_successful_requests` after the route
    /// produced a non-error response.
    pub async fn rollback(&self, key: &str) {
        if let Some(entry) = self.entries.lock().await.get_mut(key) {
            entry.count = entry.count.saturating_sub(1);
        }
    }

    /// Evict every entry whose window has already closed. Returns the
    /// number of evicted entries.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.window_reset_at > now);
        before - entries.len()
    }

    /// Number of distinct keys currently tracked.
    pub async fn active_keys(&self) -> usize {
        self.entries.lock().await.len()
    }
}
