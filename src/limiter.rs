//! Adaptive Concurrency Limiter
//!
//! Tracks a sliding window of upstream response times and nudges the shared
//! permit limit up or down, one step per cooldown, to keep the ranking API
//! inside its latency budget. The limiter has its own lock, independent of the
//! cache: latency reporters never contend with cache readers.
//!
//! The limit is advisory. A caller that reads a value an adjustment ago is at
//! most one permit off, because the limit moves by a single step per cooldown
//! window.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::LimiterConfig;

/// Ratio applied to the window maximum to estimate the 95th percentile.
/// This is a scaled maximum, not an order statistic.
const P95_RATIO: f64 = 0.8;

// == Limiter State ==
#[derive(Debug)]
struct LimiterState {
    /// Current permit limit, always within [min_limit, max_limit]
    current_limit: usize,
    /// Sliding window of observed response times, oldest first
    window: VecDeque<Duration>,
    /// When the last adjustment evaluation ran
    last_adjustment: Instant,
    /// Raises since the last lowering
    successive_increases: u32,
    /// Lowerings since latency last returned inside the band
    successive_decreases: u32,
}

// == Adaptive Limiter ==
/// Adaptive cap on concurrently in-flight upstream requests.
#[derive(Debug)]
pub struct AdaptiveLimiter {
    config: LimiterConfig,
    state: Mutex<LimiterState>,
}

/// Snapshot of limiter internals for operator diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct LimiterStats {
    /// Current permit limit
    pub current_limit: usize,
    /// Configured floor
    pub min_limit: usize,
    /// Configured ceiling
    pub max_limit: usize,
    /// Samples currently in the window
    pub window_len: usize,
    /// Average response time over the window, in milliseconds
    pub average_ms: u64,
    /// Approximate p95 response time, in milliseconds
    pub p95_ms: u64,
    /// Raises since the last lowering
    pub successive_increases: u32,
    /// Lowerings since latency last returned inside the band
    pub successive_decreases: u32,
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl AdaptiveLimiter {
    // == Constructor ==
    /// Creates a limiter starting at the configured initial limit, clamped into
    /// the [min, max] band.
    pub fn new(config: LimiterConfig) -> Self {
        let initial = config
            .initial_limit
            .clamp(config.min_limit, config.max_limit);
        Self {
            state: Mutex::new(LimiterState {
                current_limit: initial,
                window: VecDeque::with_capacity(config.window_size),
                last_adjustment: Instant::now(),
                successive_increases: 0,
                successive_decreases: 0,
            }),
            config,
        }
    }

    // == Record ==
    /// Records one upstream response time.
    ///
    /// This is the only path that mutates the limit: once the window holds
    /// enough samples and the cooldown has elapsed, a single adjustment
    /// evaluation runs. Latencies are recorded for failed calls too; a slow
    /// failure occupied upstream capacity just like a slow success.
    pub fn record_response_time(&self, elapsed: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        state.window.push_back(elapsed);
        if state.window.len() > self.config.window_size {
            state.window.pop_front();
        }

        if state.window.len() >= self.config.min_samples
            && state.last_adjustment.elapsed() >= self.config.cooldown
        {
            self.adjust(&mut state);
            state.last_adjustment = Instant::now();
        }
    }

    // == Read ==
    /// Returns the current permit limit.
    pub fn current_limit(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.current_limit
    }

    /// Returns a snapshot of all internal counters.
    pub fn stats(&self) -> LimiterStats {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        LimiterStats {
            current_limit: state.current_limit,
            min_limit: self.config.min_limit,
            max_limit: self.config.max_limit,
            window_len: state.window.len(),
            average_ms: window_average(&state.window).as_millis() as u64,
            p95_ms: approx_p95(&state.window).as_millis() as u64,
            successive_increases: state.successive_increases,
            successive_decreases: state.successive_decreases,
            taken_at: Utc::now(),
        }
    }

    // == Adjustment ==
    /// One adjustment evaluation over the current window.
    ///
    /// Three regimes: degraded (p95 or average over threshold) lowers the
    /// limit; recovering (average well under threshold, no recent lowering)
    /// raises it until the raise-streak cap; otherwise the limiter holds and a
    /// low-latency window clears the lowering streak.
    fn adjust(&self, state: &mut LimiterState) {
        let average = window_average(&state.window);
        let p95 = approx_p95(&state.window);

        if p95 > self.config.decrease_threshold || average > self.config.adjust_threshold {
            if state.current_limit > self.config.min_limit {
                state.current_limit -= 1;
                debug!(
                    limit = state.current_limit,
                    average_ms = average.as_millis() as u64,
                    p95_ms = p95.as_millis() as u64,
                    "lowered upstream concurrency limit"
                );
            }
            state.successive_decreases += 1;
            state.successive_increases = 0;
        } else if average < self.config.adjust_threshold / 2 && state.successive_decreases == 0 {
            if state.successive_increases < self.config.max_successive_increases
                && state.current_limit < self.config.max_limit
            {
                state.current_limit += 1;
                state.successive_increases += 1;
                debug!(
                    limit = state.current_limit,
                    average_ms = average.as_millis() as u64,
                    "raised upstream concurrency limit"
                );
            }
        } else {
            // Back inside the band; the next low-latency window may raise.
            state.successive_decreases = 0;
        }
    }
}

// == Window Math ==
fn window_average(window: &VecDeque<Duration>) -> Duration {
    if window.is_empty() {
        return Duration::ZERO;
    }
    let total: Duration = window.iter().sum();
    total / window.len() as u32
}

fn approx_p95(window: &VecDeque<Duration>) -> Duration {
    window
        .iter()
        .max()
        .copied()
        .unwrap_or(Duration::ZERO)
        .mul_f64(P95_RATIO)
}
