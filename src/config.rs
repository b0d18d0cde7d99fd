// src/config.rs

//! Configuration types for the bandwidth throttle

// dependencies
use crate::errors::ThrottleError;
use crate::trace_log::TrafficLog;
use std::sync::Arc;

/// Target speed used when none is configured, in KiB/s.
pub const DEFAULT_TARGET_SPEED_KBPS: u64 = 16;
/// Number of one-second slots in the rolling window.
pub const DEFAULT_WINDOW_SIZE: usize = 10;
/// Per-packet framing cost added by the wire-level recorder.
pub const DEFAULT_OVERHEAD_BYTES: u64 = 128;
/// Smallest segment the wire-level recorder will account for.
pub const DEFAULT_MIN_SEGMENT: u64 = 256;
/// Largest transfer size the advisory will ever recommend.
pub const DEFAULT_MAX_SEGMENT: u64 = 1024 * 1024;

/// Configuration for throttle behavior
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    pub(crate) name: String,
    pub(crate) target_speed_kbps: u64,
    pub(crate) window_size: usize,
    pub(crate) overhead_bytes: u64,
    pub(crate) min_segment: u64,
    pub(crate) max_segment: u64,
    pub(crate) trace_log: Option<Arc<TrafficLog>>,
}

impl ThrottleConfig {
    /// Create a new configuration with a target speed in KiB/s and a window in slots.
    /// A negative speed means "unset" and selects the default of 16 KiB/s.
    pub fn new(target_speed_kbps: i64, window_size: usize) -> Self {
        Self::default()
            .target_speed(target_speed_kbps)
            .window_size(window_size)
    }

    /// Builder-style: set the name used in log events
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style: set target speed in KiB/s (negative selects the default)
    pub fn target_speed(mut self, target_speed_kbps: i64) -> Self {
        self.target_speed_kbps = resolve_target_speed(target_speed_kbps);
        self
    }

    /// Builder-style: set window size in slots
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Builder-style: set per-packet overhead in bytes
    pub fn overhead_bytes(mut self, overhead_bytes: u64) -> Self {
        self.overhead_bytes = overhead_bytes;
        self
    }

    /// Builder-style: set minimum segment in bytes
    pub fn min_segment(mut self, min_segment: u64) -> Self {
        self.min_segment = min_segment;
        self
    }

    /// Builder-style: set maximum segment in bytes
    pub fn max_segment(mut self, max_segment: u64) -> Self {
        self.max_segment = max_segment;
        self
    }

    /// Builder-style: append one line per recorded transfer to `log`
    pub fn trace_log(mut self, log: Arc<TrafficLog>) -> Self {
        self.trace_log = Some(log);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ThrottleError> {
        if self.target_speed_kbps == 0 {
            return Err(ThrottleError::InvalidTargetSpeed);
        }
        if self.window_size == 0 {
            return Err(ThrottleError::InvalidWindowSize);
        }
        if self.max_segment == 0 || self.min_segment > self.max_segment {
            return Err(ThrottleError::InvalidSegmentBounds);
        }
        Ok(())
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            name: String::from("throttle"),
            target_speed_kbps: DEFAULT_TARGET_SPEED_KBPS,
            window_size: DEFAULT_WINDOW_SIZE,
            overhead_bytes: DEFAULT_OVERHEAD_BYTES,
            min_segment: DEFAULT_MIN_SEGMENT,
            max_segment: DEFAULT_MAX_SEGMENT,
            trace_log: None,
        }
    }
}

// negative speeds are the "unset" marker used by command-line parsers
pub(crate) fn resolve_target_speed(target_speed_kbps: i64) -> u64 {
    u64::try_from(target_speed_kbps).unwrap_or(DEFAULT_TARGET_SPEED_KBPS)
}
