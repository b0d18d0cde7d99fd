// src/throttle.rs

// net-throttle: sliding-window bandwidth throttle engine.

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::{ThrottleConfig, resolve_target_speed};
use crate::errors::ThrottleError;
use crate::history::{SLOT_SIZE, TrafficHistory, slot_of};
use crate::trace_log::TrafficLog;
use std::sync::Arc;
use tracing::{Level, debug, info, trace};

/// Window used by the fast-reacting transport-size estimate, in slots.
const SHORT_WINDOW_SLOTS: usize = 5;

// weight of the various windows in the transport-size decision
const WEIGHT_FULL: f64 = 20.0;
const WEIGHT_HALF: f64 = 10.0;
const WEIGHT_SHORT: f64 = 10.0;
const WEIGHT_MIN: f64 = 10.0;

// share of the delay attributed to traffic already sent vs. the pending packet
const COMMITTED_WEIGHT: f64 = 0.80;
const PENDING_WEIGHT: f64 = 0.20;

/// The throttle engine.
/// Keeps a rolling window of per-second traffic and turns it into a sleep
/// advisory and a transfer-size advisory. The engine does no locking of its
/// own; wrap it in a [`ConnectionThrottle`](crate::ConnectionThrottle) to
/// share it between threads.
/// C is the clock type, defaulting to MonotonicClock.
#[derive(Debug)]
pub struct ThrottleEngine<C = MonotonicClock>
where
    C: Clock,
{
    name: String,
    target_speed: f64, // bytes per second
    window_size: usize,
    overhead_bytes: u64,
    min_segment: u64,
    max_segment: u64,
    start_time: f64,
    last_sample_time: f64,
    any_packet_yet: bool,
    history: TrafficHistory,
    trace_log: Option<Arc<TrafficLog>>,
    clock: C,
}

/// Result of a delay calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleTimes {
    /// Length of the observed window in seconds
    pub window: f64,
    /// Average speed over the window in bytes per second
    pub average: f64,
    /// Seconds to wait before the next transfer; zero or negative means no wait
    pub delay: f64,
    /// Bytes that still fit in the window's budget; may be negative
    pub recommended_size: f64,
}

/// Point-in-time view of an engine, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleSnapshot {
    /// Name used in log events
    pub name: String,
    /// Target speed in KiB/s
    pub target_speed: u64,
    /// Number of slots in the window
    pub window_size: usize,
    /// Bytes per slot, open slot first
    pub history: Vec<u64>,
    /// Average over closed slots in bytes per second
    pub current_speed: f64,
    /// Whether any traffic has been seen yet
    pub any_packet_yet: bool,
}

// methods for the ThrottleEngine type
impl<C> ThrottleEngine<C>
where
    C: Clock,
{
    // method to create an engine from an already validated config
    pub(crate) fn build(config: ThrottleConfig, clock: C) -> Self {
        Self {
            name: config.name,
            target_speed: config.target_speed_kbps.saturating_mul(1024) as f64,
            window_size: config.window_size,
            overhead_bytes: config.overhead_bytes,
            min_segment: config.min_segment,
            max_segment: config.max_segment,
            start_time: 0.0,
            last_sample_time: 0.0,
            any_packet_yet: false,
            history: TrafficHistory::new(config.window_size),
            trace_log: config.trace_log,
            clock,
        }
    }

    /// Create a new engine from a config object
    pub fn with_config(config: ThrottleConfig, clock: C) -> Result<Self, ThrottleError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target speed in KiB/s
    pub fn target_speed(&self) -> u64 {
        (self.target_speed / 1024.0) as u64
    }

    /// Change the target speed in KiB/s. A negative value restores the default.
    pub fn set_target_speed(&mut self, target_speed_kbps: i64) -> Result<(), ThrottleError> {
        let kbps = resolve_target_speed(target_speed_kbps);
        if kbps == 0 {
            return Err(ThrottleError::InvalidTargetSpeed);
        }
        self.target_speed = kbps.saturating_mul(1024) as f64;
        info!(throttle = %self.name, limit_kbps = kbps, "setting limit");
        Ok(())
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn history(&self) -> &TrafficHistory {
        &self.history
    }

    pub fn any_packet_yet(&self) -> bool {
        self.any_packet_yet
    }

    /// Time of the latest rotation, or `None` before any traffic.
    pub fn last_sample_time(&self) -> Option<f64> {
        self.any_packet_yet.then_some(self.last_sample_time)
    }

    /// Bring the window up to the current time.
    /// Returns how many slots were closed, capped at the window size since
    /// further rotations would only shift empty slots.
    pub fn tick(&mut self) -> Result<usize, ThrottleError> {
        let now = self.clock.now()?;
        Ok(self.rotate_to(now))
    }

    fn rotate_to(&mut self, now: f64) -> usize {
        if !self.any_packet_yet {
            self.history.rotate();
            self.start_time = now;
            self.last_sample_time = now;
            self.any_packet_yet = true;
            trace!(throttle = %self.name, now, "starting traffic window");
            return 1;
        }

        if now <= self.last_sample_time {
            // clock stalled or went backwards: no rotation this call, but later
            // calls count slots from the new reading
            trace!(throttle = %self.name, now, last = self.last_sample_time, "clock did not advance");
            self.last_sample_time = now;
            self.start_time = self.start_time.min(now);
            return 0;
        }

        let current_slot = slot_of(now);
        let mut sample_time = self.last_sample_time;
        let mut rotated = 0;
        while slot_of(sample_time) < current_slot && rotated < self.history.len() {
            trace!(
                throttle = %self.name,
                from = slot_of(sample_time),
                to = current_slot,
                "moving counter buffer by one slot"
            );
            self.history.rotate();
            sample_time += SLOT_SIZE;
            rotated += 1;
        }
        self.last_sample_time = now;
        rotated
    }

    /// Record exactly `size` bytes of traffic in the current slot.
    pub fn record_exact(&mut self, size: u64) -> Result<(), ThrottleError> {
        self.record(size, size)
    }

    /// Record a wire-level segment: framing overhead is added and the result is
    /// raised to the minimum segment size.
    pub fn record_segment(&mut self, size: u64) -> Result<(), ThrottleError> {
        let wire_size = size
            .saturating_add(self.overhead_bytes)
            .max(self.min_segment);
        self.record(wire_size, size)
    }

    fn record(&mut self, size: u64, original_size: u64) -> Result<(), ThrottleError> {
        let now = self.clock.now()?;
        self.rotate_to(now);

        if tracing::enabled!(Level::DEBUG) {
            let full = self.times_at(now, size, None);
            let short = self.times_at(now, size, Some(SHORT_WINDOW_SLOTS));
            debug!(
                throttle = %self.name,
                size,
                original_size,
                avg_kbps = (full.average / 1024.0) as i64,
                window = full.window,
                short_avg_kbps = (short.average / 1024.0) as i64,
                short_window = short.window,
                limit_kbps = self.target_speed(),
                history = ?self.history.to_vec(),
                "recording traffic"
            );
        }

        self.history.add(size);

        if let Some(log) = &self.trace_log {
            log.append(now, original_size);
        }
        Ok(())
    }

    /// Work out the delay and size advisory for a pending packet of
    /// `packet_size` bytes. The window used is the larger of the configured
    /// window and `window_override`. Does not modify the engine.
    pub fn compute(
        &self,
        packet_size: u64,
        window_override: Option<usize>,
    ) -> Result<ThrottleTimes, ThrottleError> {
        let now = self.clock.now()?;
        Ok(self.times_at(now, packet_size, window_override))
    }

    fn times_at(&self, now: f64, packet_size: u64, window_override: Option<usize>) -> ThrottleTimes {
        let window_slots = self
            .window_size
            .max(window_override.unwrap_or(self.window_size));

        if !self.any_packet_yet {
            // nothing seen yet, no basis to throttle
            return ThrottleTimes {
                window: 0.0,
                average: 0.0,
                delay: 0.0,
                recommended_size: self.min_segment as f64,
            };
        }

        // the open slot only counts for the part of it that has elapsed
        let mut window_len = (window_slots as f64 - 1.0) * SLOT_SIZE;
        window_len += self.last_sample_time - slot_of(self.last_sample_time);

        let time_passed = now - self.start_time;
        let window = window_len.min(time_passed).max(SLOT_SIZE);

        let e_past = self.history.total() as f64;
        let e_now = e_past + packet_size as f64;

        let m = self.target_speed;
        let d1 = (e_past - m * window) / m;
        let d2 = (e_now - m * window) / m;

        let mut delay = d1 * COMMITTED_WEIGHT + d2 * PENDING_WEIGHT;
        let average = e_past / window;

        if e_past == 0.0 && delay >= 0.0 {
            delay = 0.0;
        }

        ThrottleTimes {
            window,
            average,
            delay,
            recommended_size: m * window - e_past,
        }
    }

    /// Seconds to wait before sending `packet_size` bytes, over the configured window.
    pub fn sleep_time(&self, packet_size: u64) -> Result<f64, ThrottleError> {
        let times = self.compute(packet_size, Some(self.window_size))?;
        debug!(
            throttle = %self.name,
            sleep = times.delay > 0.0,
            average = times.average,
            limit = self.target_speed,
            delay = times.delay,
            window = times.window,
            recommended = times.recommended_size,
            history = ?self.history.to_vec(),
            last_sample_time = self.last_sample_time,
            "computed sleep time"
        );
        Ok(times.delay)
    }

    /// Rotate to now, then compute the sleep time.
    pub fn sleep_time_after_tick(&mut self, packet_size: u64) -> Result<f64, ThrottleError> {
        self.tick()?;
        self.sleep_time(packet_size)
    }

    /// Recommended size of the next transfer in bytes, always within
    /// `[0, max_segment]`. Blends the full window, half the window and a
    /// five-slot window, plus the smallest of the three.
    pub fn recommended_transport_size(&self) -> Result<u64, ThrottleError> {
        let now = self.clock.now()?;
        let full = self.transport_size_for(now, None);
        let half = self.transport_size_for(now, Some(self.window_size / 2));
        let short = self.transport_size_for(now, Some(SHORT_WINDOW_SLOTS));
        let smallest = full.min(half).min(short);

        let weighted = (full as f64 * WEIGHT_FULL
            + half as f64 * WEIGHT_HALF
            + short as f64 * WEIGHT_SHORT
            + smallest as f64 * WEIGHT_MIN)
            / (WEIGHT_FULL + WEIGHT_HALF + WEIGHT_SHORT + WEIGHT_MIN);
        Ok((weighted as u64).min(self.max_segment))
    }

    fn transport_size_for(&self, now: f64, window_override: Option<usize>) -> u64 {
        let times = self.times_at(now, 0, window_override);
        let size = times.recommended_size + self.overhead_bytes as f64;
        size.clamp(0.0, self.max_segment as f64) as u64
    }

    /// Average speed over the closed slots, in bytes per second.
    pub fn current_speed(&self) -> f64 {
        let slots = self.history.len();
        if slots <= 1 {
            return 0.0;
        }
        self.history.closed_total() as f64 / ((slots - 1) as f64 * SLOT_SIZE)
    }

    pub fn snapshot(&self) -> ThrottleSnapshot {
        ThrottleSnapshot {
            name: self.name.clone(),
            target_speed: self.target_speed(),
            window_size: self.window_size,
            history: self.history.to_vec(),
            current_speed: self.current_speed(),
            any_packet_yet: self.any_packet_yet,
        }
    }
}
