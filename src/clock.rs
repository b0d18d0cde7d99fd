// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::Instant;
use thiserror::Error;

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns elapsed seconds as an `f64`. The origin is
/// arbitrary; the throttle only ever looks at differences between readings.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<f64, ClockError>;
}

/// Clock error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("system time unavailable")]
    SystemTimeError,
}

/// MonotonicClock implementation backed by `Instant`.
/// Seconds are measured from the moment the clock was created.
/// This is the default clock used by the throttle engine.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Result<f64, ClockError> {
        Ok(self.origin.elapsed().as_secs_f64())
    }
}
