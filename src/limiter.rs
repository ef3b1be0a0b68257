// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for form submissions.
//!
//! Each client identifier owns at most one bucket holding a request count
//! and the instant its window closes. Expired buckets are dropped lazily on
//! the next request from the same identifier; there is no background sweep.
//!
//! The window is fixed, not sliding: a client can land `max_requests` at the
//! end of one window and `max_requests` again at the start of the next.
//!
//! State is process-local. It resets on restart and is not shared between
//! instances.

use crate::config::RateLimitConfig;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Identifier shared by every client whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window closes
    pub reset_at: DateTime<Utc>,
    /// Whole seconds until `reset_at`, rounded up
    pub retry_after_secs: u64,
}

/// Per-identifier window state.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Thread-safe fixed-window rate limiter.
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl FixedWindowLimiter {
    /// Create a limiter driven by the wall clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a limiter driven by the given clock.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request against `identifier` and decide whether it may
    /// proceed. Never fails.
    pub fn check(&self, identifier: &str) -> Decision {
        let now = self.clock.now();
        let max = self.config.max_requests;
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        if buckets
            .get(identifier)
            .is_some_and(|bucket| now > bucket.reset_at)
        {
            debug!(identifier, "Rate limit window expired");
            buckets.remove(identifier);
        }

        let Some(bucket) = buckets.get_mut(identifier) else {
            let reset_at = now + self.config.window();
            buckets.insert(identifier.to_string(), Bucket { count: 1, reset_at });
            return self.decision(true, max.saturating_sub(1), reset_at, now);
        };

        if bucket.count >= max {
            debug!(identifier, count = bucket.count, "Rate limit exceeded");
            return self.decision(false, 0, bucket.reset_at, now);
        }

        bucket.count += 1;
        let remaining = max - bucket.count;
        let reset_at = bucket.reset_at;
        self.decision(true, remaining, reset_at, now)
    }

    /// Number of identifiers currently holding a bucket, expired or not.
    pub fn tracked_identifiers(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn decision(
        &self,
        allowed: bool,
        remaining: u32,
        reset_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Decision {
        Decision {
            allowed,
            limit: self.config.max_requests,
            remaining,
            reset_at,
            retry_after_secs: ceil_secs(reset_at - now),
        }
    }
}

fn ceil_secs(delta: TimeDelta) -> u64 {
    let millis = delta.num_milliseconds().max(0) as u64;
    millis.div_ceil(1000)
}
