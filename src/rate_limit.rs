// src/rate_limit.rs
//! Per-source fixed-window request budgets.
//!
//! The window is fixed, not sliding: a source can burst at a window
//! boundary (up to 2x the budget across the seam). Accepted tradeoff,
//! kept coarse on purpose.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::registry::RateLimitPolicy;

#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    window_reset_at: DateTime<Utc>,
}

/// Tracks one window per source id. Process-lifetime state, reset only by
/// window expiry. The read-modify-write per source is serialized behind a
/// single mutex; this is the engine's only shared mutable state.
#[derive(Debug, Default)]
pub struct RateLimiter {
    states: Mutex<HashMap<String, WindowState>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the call may proceed, consuming one unit of the
    /// source's budget. False means the window is exhausted; state is not
    /// mutated further.
    pub fn try_acquire(&self, source_id: &str, policy: &RateLimitPolicy) -> bool {
        self.try_acquire_at(source_id, policy, Utc::now())
    }

    /// Same as [`try_acquire`](Self::try_acquire) with an injected clock.
    pub fn try_acquire_at(
        &self,
        source_id: &str,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> bool {
        let mut states = self.states.lock().expect("rate limiter mutex poisoned");
        match states.get_mut(source_id) {
            Some(state) if now < state.window_reset_at => {
                if state.count < policy.requests_per_window {
                    state.count += 1;
                    true
                } else {
                    false
                }
            }
            _ => {
                // Fresh window; this call consumes the first unit.
                states.insert(
                    source_id.to_string(),
                    WindowState {
                        count: 1,
                        window_reset_at: now + Duration::minutes(policy.window_minutes),
                    },
                );
                true
            }
        }
    }

    /// Remaining budget within the current window (full budget if the
    /// window expired or was never opened). Observability only.
    pub fn remaining(&self, source_id: &str, policy: &RateLimitPolicy) -> u32 {
        let states = self.states.lock().expect("rate limiter mutex poisoned");
        match states.get(source_id) {
            Some(state) if Utc::now() < state.window_reset_at => {
                policy.requests_per_window.saturating_sub(state.count)
            }
            _ => policy.requests_per_window,
        }
    }
}
