// src/connection.rs

// thread-safe throttle: one engine behind its own lock

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::ThrottleConfig;
use crate::errors::ThrottleError;
use crate::throttle::{ThrottleEngine, ThrottleSnapshot, ThrottleTimes};
use parking_lot::Mutex;
use std::time::Duration;

/// A throttle that can be shared between the read and write paths of a
/// connection, or between every connection when used as a global limit.
/// Every call takes the lock for its whole duration, so a rotation and the
/// computation that follows it always see the same state.
#[derive(Debug)]
pub struct ConnectionThrottle<C = MonotonicClock>
where
    C: Clock,
{
    engine: Mutex<ThrottleEngine<C>>,
}

/// What the I/O layer should do before its next transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// How long to wait; zero when no wait is needed
    pub delay: Duration,
    /// Upper bound for the next buffer, in bytes
    pub next_size: u64,
}

impl<C> ConnectionThrottle<C>
where
    C: Clock,
{
    pub fn with_config(config: ThrottleConfig, clock: C) -> Result<Self, ThrottleError> {
        Ok(Self::from_engine(ThrottleEngine::with_config(config, clock)?))
    }

    pub fn from_engine(engine: ThrottleEngine<C>) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    pub fn name(&self) -> String {
        self.engine.lock().name().to_owned()
    }

    pub fn target_speed(&self) -> u64 {
        self.engine.lock().target_speed()
    }

    pub fn set_target_speed(&self, target_speed_kbps: i64) -> Result<(), ThrottleError> {
        self.engine.lock().set_target_speed(target_speed_kbps)
    }

    pub fn tick(&self) -> Result<usize, ThrottleError> {
        self.engine.lock().tick()
    }

    pub fn record_exact(&self, size: u64) -> Result<(), ThrottleError> {
        self.engine.lock().record_exact(size)
    }

    pub fn record_segment(&self, size: u64) -> Result<(), ThrottleError> {
        self.engine.lock().record_segment(size)
    }

    pub fn compute(
        &self,
        packet_size: u64,
        window_override: Option<usize>,
    ) -> Result<ThrottleTimes, ThrottleError> {
        self.engine.lock().compute(packet_size, window_override)
    }

    pub fn sleep_time(&self, packet_size: u64) -> Result<f64, ThrottleError> {
        self.engine.lock().sleep_time(packet_size)
    }

    pub fn sleep_time_after_tick(&self, packet_size: u64) -> Result<f64, ThrottleError> {
        self.engine.lock().sleep_time_after_tick(packet_size)
    }

    pub fn recommended_transport_size(&self) -> Result<u64, ThrottleError> {
        self.engine.lock().recommended_transport_size()
    }

    pub fn current_speed(&self) -> f64 {
        self.engine.lock().current_speed()
    }

    pub fn last_sample_time(&self) -> Option<f64> {
        self.engine.lock().last_sample_time()
    }

    pub fn snapshot(&self) -> ThrottleSnapshot {
        self.engine.lock().snapshot()
    }

    /// Account for a completed transfer of `transferred` bytes and advise the
    /// next one, all under a single lock acquisition.
    pub fn pace(&self, transferred: u64) -> Result<Pacing, ThrottleError> {
        let mut engine = self.engine.lock();
        engine.record_segment(transferred)?;
        let delay = engine.sleep_time_after_tick(0)?;
        let next_size = engine.recommended_transport_size()?;
        Ok(Pacing {
            delay: to_wait(delay),
            next_size,
        })
    }
}

// negative or zero delays mean "go now"
fn to_wait(delay_seconds: f64) -> Duration {
    if delay_seconds > 0.0 {
        Duration::try_from_secs_f64(delay_seconds).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
