//! Circuit breaker for backend protection.
//!
//! # States
//! - Closed: normal operation, requests pass through, failures are counted
//! - Open: backend assumed down, requests fail fast
//! - Half-Open: reset timeout elapsed, requests are let through to probe recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive_failures >= failure_threshold
//! Open → Half-Open: first ready() call after reset_timeout has elapsed
//! Half-Open → Closed: a request succeeds
//! Half-Open → Open: a request fails (threshold ignored)
//! ```
//!
//! # Design Decisions
//! - Per-backend circuit breaker (not global)
//! - Lock-free: every field is an atomic, transitions use compare-exchange
//! - Half-Open does not serialize probes; any number of concurrent requests
//!   may pass, and the first failure among them reopens the circuit
//! - `record_success` zeroes the failure count even when it races a
//!   concurrent `record_failure`; a failure streak can be masked by one
//!   interleaved success

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

/// Breaker state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl From<u8> for BreakerState {
    fn from(val: u8) -> Self {
        match val {
            1 => BreakerState::Open,
            2 => BreakerState::HalfOpen,
            _ => BreakerState::Closed,
        }
    }
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for BreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds shared by every breaker built from the same configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerConfig {
    /// Consecutive failures that open a closed circuit. Must be positive.
    pub failure_threshold: u32,
    /// How long an open circuit rejects requests before allowing probes.
    pub reset_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

/// Failure-tracking state machine for a single backend.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    reset_timeout: Duration,
    state: AtomicU8,
    consecutive_failures: AtomicU32,
    /// Nanoseconds since `epoch` of the last failure that opened (or kept open) the circuit.
    last_failure: AtomicU64,
    epoch: Instant,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold.max(1),
            reset_timeout: config.reset_timeout,
            state: AtomicU8::new(BreakerState::Closed as u8),
            consecutive_failures: AtomicU32::new(0),
            last_failure: AtomicU64::new(0),
            epoch: Instant::now(),
        }
    }

    /// Current state. Does not perform the Open → Half-Open transition.
    pub fn state(&self) -> BreakerState {
        BreakerState::from(self.state.load(Ordering::Acquire))
    }

    /// Current consecutive failure count.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Acquire)
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn reset_timeout(&self) -> Duration {
        self.reset_timeout
    }

    /// Return true if a request may be sent to the backend.
    ///
    /// Closed and Half-Open always admit. An Open circuit admits only once
    /// `reset_timeout` has passed since the last failure, and only for the
    /// caller that wins the Open → Half-Open exchange.
    pub fn ready(&self) -> bool {
        match self.state() {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Open => {
                let since_failure = self
                    .now_nanos()
                    .saturating_sub(self.last_failure.load(Ordering::Acquire));
                if u128::from(since_failure) > self.reset_timeout.as_nanos() {
                    self.transition(BreakerState::Open, BreakerState::HalfOpen)
                } else {
                    false
                }
            }
        }
    }

    /// Report a successful request.
    ///
    /// Returns the new state if this call closed the circuit.
    pub fn record_success(&self) -> Option<BreakerState> {
        if self.state() == BreakerState::Closed
            && self.consecutive_failures.load(Ordering::Acquire) == 0
        {
            return None;
        }

        let closed = self.transition(BreakerState::HalfOpen, BreakerState::Closed);
        self.consecutive_failures.store(0, Ordering::Release);
        closed.then_some(BreakerState::Closed)
    }

    /// Report a failed request.
    ///
    /// Returns the new state if this call opened the circuit.
    pub fn record_failure(&self) -> Option<BreakerState> {
        if self.transition(BreakerState::HalfOpen, BreakerState::Open) {
            self.stamp_failure();
            return Some(BreakerState::Open);
        }

        let count = self
            .consecutive_failures
            .fetch_add(1, Ordering::AcqRel)
            .saturating_add(1);
        if count >= self.failure_threshold {
            let opened = self.transition(BreakerState::Closed, BreakerState::Open);
            // Late failures on an already open circuit push the reset window out.
            self.stamp_failure();
            return opened.then_some(BreakerState::Open);
        }
        None
    }

    fn transition(&self, from: BreakerState, to: BreakerState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn stamp_failure(&self) {
        self.last_failure.store(self.now_nanos(), Ordering::Release);
    }

    fn now_nanos(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn breaker(threshold: u32, timeout_ms: u64) -> CircuitBreaker {
        CircuitBreaker::new(BreakerConfig {
            failure_threshold: threshold,
            reset_timeout: Duration::from_millis(timeout_ms),
        })
    }

    #[test]
    fn opens_exactly_at_threshold() {
        let cb = breaker(5, 30_000);
        for i in 1..5 {
            assert_eq!(cb.record_failure(), None, "opened early at failure {}", i);
            assert_eq!(cb.state(), BreakerState::Closed);
            assert!(cb.ready());
        }
        assert_eq!(cb.record_failure(), Some(BreakerState::Open));
        assert_eq!(cb.state(), BreakerState::Open);
        assert!(!cb.ready());
    }

    #[test]
    fn success_resets_failure_streak() {
        let cb = breaker(3, 30_000);
        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.consecutive_failures(), 2);

        assert_eq!(cb.record_success(), None);
        assert_eq!(cb.consecutive_failures(), 0);

        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::Closed);
    }

    #[test]
    fn healthy_success_is_noop() {
        let cb = breaker(3, 30_000);
        assert_eq!(cb.record_success(), None);
        assert_eq!(cb.state(), BreakerState::Closed);
        assert_eq!(cb.consecutive_failures(), 0);
    }

    #[test]
    fn rejects_until_reset_timeout_then_grants_one_probe() {
        let cb = breaker(1, 50);
        cb.record_failure();
        thread::sleep(Duration::from_millis(1));
        assert!(!cb.ready(), "must fail fast right after opening");

        thread::sleep(Duration::from_millis(80));
        assert!(cb.ready(), "probe should be granted after timeout");
        assert_eq!(cb.state(), BreakerState::HalfOpen);
        // Half-open admits further requests without another transition.
        assert!(cb.ready());
    }

    #[test]
    fn contended_half_open_transition_admits() {
        let cb = Arc::new(breaker(1, 10));
        cb.record_failure();
        thread::sleep(Duration::from_millis(30));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cb = cb.clone();
                thread::spawn(move || cb.ready())
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ready| *ready)
            .count();

        assert_eq!(cb.state(), BreakerState::HalfOpen);
        assert!(admitted >= 1);
    }

    #[test]
    fn failed_probe_reopens_and_restarts_window() {
        let cb = breaker(5, 50);
        for _ in 0..5 {
            cb.record_failure();
        }
        thread::sleep(Duration::from_millis(80));
        assert!(cb.ready());
        assert_eq!(cb.state(), BreakerState::HalfOpen);

        assert_eq!(cb.record_failure(), Some(BreakerState::Open));
        assert_eq!(cb.state(), BreakerState::Open);
        assert!(!cb.ready(), "reset window restarts on reopen");

        thread::sleep(Duration::from_millis(80));
        assert!(cb.ready());
    }

    #[test]
    fn successful_probe_closes() {
        let cb = breaker(2, 20);
        cb.record_failure();
        cb.record_failure();
        thread::sleep(Duration::from_millis(40));
        assert!(cb.ready());

        assert_eq!(cb.record_success(), Some(BreakerState::Closed));
        assert_eq!(cb.state(), BreakerState::Closed);
        assert_eq!(cb.consecutive_failures(), 0);

        // Needs a full streak again to reopen.
        assert_eq!(cb.record_failure(), None);
        assert_eq!(cb.record_failure(), Some(BreakerState::Open));
    }

    #[test]
    fn concurrent_failures_are_all_counted() {
        let cb = Arc::new(breaker(1_000, 30_000));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cb = cb.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        cb.record_failure();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cb.consecutive_failures(), 400);
        assert_eq!(cb.state(), BreakerState::Closed);
    }

    #[test]
    fn config_is_exposed() {
        let cb = CircuitBreaker::default();
        assert_eq!(cb.failure_threshold(), 5);
        assert_eq!(cb.reset_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn threshold_of_zero_behaves_as_one() {
        let cb = breaker(0, 30_000);
        assert_eq!(cb.record_failure(), Some(BreakerState::Open));
    }
}
