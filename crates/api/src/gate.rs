//! Recency-gated refetch policy.
//!
//! Fetch deduplication only needs "don't fetch again too soon", so a
//! timestamp-comparison gate is sufficient; no mutexes guard the network
//! calls themselves. A dispatch for a (provider, wallet, chain) key is
//! allowed when the key's last completion is outside the freshness window
//! AND the provider's last completion for any key is outside the global
//! cool-down. In-flight dispatches are tracked so a concurrent second
//! dispatch for the same key never starts a redundant call; the gate is
//! re-evaluated at dispatch time, not fetch-completion time.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Default)]
struct GateState {
    in_flight: HashSet<String>,
    last_by_key: HashMap<String, Instant>,
    last_any: Option<Instant>,
    forced: HashSet<String>,
}

/// Per-provider refetch gate.
pub struct RecencyGate {
    freshness: Duration,
    cooldown: Duration,
    state: Mutex<GateState>,
}

impl RecencyGate {
    pub fn new(freshness: Duration, cooldown: Duration) -> Self {
        Self {
            freshness,
            cooldown,
            state: Mutex::new(GateState::default()),
        }
    }

    /// Whether a dispatch for `key` is allowed at `now`.
    ///
    /// Consumes a pending one-shot bypass for the key if one was armed.
    pub fn should_dispatch(&self, key: &str, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.in_flight.contains(key) {
            return false;
        }
        if state.forced.remove(key) {
            return true;
        }
        let elapsed = |since: Instant, window: Duration| {
            now.checked_duration_since(since)
                .is_some_and(|d| d >= window)
        };
        let fresh = state
            .last_by_key
            .get(key)
            .map_or(true, |t| elapsed(*t, self.freshness));
        let cooled = state
            .last_any
            .map_or(true, |t| elapsed(t, self.cooldown));
        fresh && cooled
    }

    /// Record that a dispatch for `key` has started.
    pub fn mark_dispatched(&self, key: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.insert(key.to_string());
    }

    /// Record that the fetch for `key` resolved and was merged at `now`.
    pub fn mark_completed(&self, key: &str, now: Instant) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.remove(key);
        state.last_by_key.insert(key.to_string(), now);
        state.last_any = Some(state.last_any.map_or(now, |t| t.max(now)));
    }

    /// Record that the fetch for `key` failed.
    ///
    /// No completion timestamp is written, so the next eligible dispatch
    /// naturally retries.
    pub fn mark_failed(&self, key: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.remove(key);
    }

    /// Arm a one-shot bypass for `key` (manual retry affordance). The next
    /// `should_dispatch` for the key returns true regardless of windows.
    pub fn force_once(&self, key: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.forced.insert(key.to_string());
    }
}
