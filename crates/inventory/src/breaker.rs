//! Circuit breaker guarding calls to the remote inventory service.
//!
//! One breaker exists per protected operation kind and lives for the
//! whole process. State transitions:
//!
//! ```text
//! Closed ──[failures exceed threshold]──► Open ──[cooldown elapsed]──► HalfOpen
//! HalfOpen ──[N consecutive successes]──► Closed
//! HalfOpen ──[any failure]──► Open
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through.
    Closed,
    /// The dependency is considered down; calls short-circuit to fallback.
    Open,
    /// Cooldown elapsed; probe calls are allowed through.
    HalfOpen,
}

impl CircuitState {
    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "Closed",
            CircuitState::Open => "Open",
            CircuitState::HalfOpen => "HalfOpen",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Breaker tuning.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker from Closed.
    pub failure_threshold: u32,
    /// Failure rate over a full sample window that opens the breaker,
    /// in `0.0..=1.0`. Only applied once the window is full.
    pub failure_rate_threshold: f64,
    /// Number of recent call samples kept for the rate check.
    pub sample_window: usize,
    /// How long the breaker stays Open before allowing a probe.
    pub cooldown: Duration,
    /// Consecutive successes in HalfOpen that close the breaker.
    pub success_threshold: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            failure_rate_threshold: 0.5,
            sample_window: 20,
            cooldown: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

/// The breaker state machine, separated from the clock and the lock so
/// transitions are plain functions of (state, sample, now).
#[derive(Debug)]
struct BreakerCore {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    /// Rolling window of recent samples, `true` = success.
    samples: VecDeque<bool>,
}

impl BreakerCore {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            opened_at: None,
            samples: VecDeque::new(),
        }
    }

    /// Decides whether a call may go through, transitioning
    /// Open → HalfOpen when the cooldown has elapsed.
    fn allow(&mut self, config: &BreakerConfig, now: Instant) -> bool {
        match self.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => match self.opened_at {
                Some(at) if now.duration_since(at) >= config.cooldown => {
                    self.state = CircuitState::HalfOpen;
                    self.consecutive_successes = 0;
                    true
                }
                _ => false,
            },
        }
    }

    /// Records a success sample. Returns the new state if a transition
    /// occurred.
    fn on_success(&mut self, config: &BreakerConfig) -> Option<CircuitState> {
        self.push_sample(config, true);
        self.consecutive_failures = 0;
        if self.state == CircuitState::HalfOpen {
            self.consecutive_successes += 1;
            if self.consecutive_successes >= config.success_threshold {
                self.state = CircuitState::Closed;
                self.opened_at = None;
                return Some(CircuitState::Closed);
            }
        }
        None
    }

    /// Records a failure sample. Returns the new state if a transition
    /// occurred.
    fn on_failure(&mut self, config: &BreakerConfig, now: Instant) -> Option<CircuitState> {
        self.push_sample(config, false);
        self.consecutive_failures += 1;
        match self.state {
            CircuitState::Closed => {
                let rate_tripped = self
                    .window_failure_rate(config)
                    .is_some_and(|rate| rate >= config.failure_rate_threshold);
                if self.consecutive_failures >= config.failure_threshold || rate_tripped {
                    self.open(now);
                    return Some(CircuitState::Open);
                }
            }
            // Any failure while probing reopens the breaker and restarts
            // the cooldown clock.
            CircuitState::HalfOpen => {
                self.open(now);
                return Some(CircuitState::Open);
            }
            CircuitState::Open => {}
        }
        None
    }

    fn open(&mut self, now: Instant) {
        self.state = CircuitState::Open;
        self.opened_at = Some(now);
        self.consecutive_successes = 0;
    }

    fn push_sample(&mut self, config: &BreakerConfig, success: bool) {
        if self.samples.len() == config.sample_window {
            self.samples.pop_front();
        }
        self.samples.push_back(success);
    }

    /// Failure rate over the rolling window; `None` until the window is
    /// full, so a cold breaker is not tripped by its first few samples.
    fn window_failure_rate(&self, config: &BreakerConfig) -> Option<f64> {
        if self.samples.len() < config.sample_window {
            return None;
        }
        let failures = self.samples.iter().filter(|s| !**s).count();
        Some(failures as f64 / self.samples.len() as f64)
    }
}

/// A circuit breaker for one protected inventory operation.
///
/// Samples are recorded under a single mutex so concurrent requests
/// cannot interleave updates and flap the state.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: &'static str,
    config: BreakerConfig,
    core: Mutex<BreakerCore>,
}

impl CircuitBreaker {
    /// Creates a breaker for the named operation.
    pub fn new(name: &'static str, config: BreakerConfig) -> Self {
        Self {
            name,
            config,
            core: Mutex::new(BreakerCore::new()),
        }
    }

    /// Returns the current state without recording a sample.
    pub fn state(&self) -> CircuitState {
        self.core.lock().unwrap().state
    }

    /// Returns true if a call may go through right now.
    pub fn allow_request(&self) -> bool {
        let mut core = self.core.lock().unwrap();
        let before = core.state;
        let allowed = core.allow(&self.config, Instant::now());
        if before == CircuitState::Open && core.state == CircuitState::HalfOpen {
            tracing::info!(breaker = self.name, "circuit breaker half-open, probing");
        }
        allowed
    }

    /// Records a successful call.
    pub fn record_success(&self) {
        if let Some(next) = self.core.lock().unwrap().on_success(&self.config) {
            tracing::info!(breaker = self.name, state = %next, "circuit breaker closed");
        }
    }

    /// Records a failed call (error, timeout, or malformed response).
    pub fn record_failure(&self) {
        if let Some(next) = self
            .core
            .lock()
            .unwrap()
            .on_failure(&self.config, Instant::now())
        {
            tracing::warn!(breaker = self.name, state = %next, "circuit breaker opened");
        }
    }
}
