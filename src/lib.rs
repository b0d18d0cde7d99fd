// src/lib.rs

//! # Net Throttle
//!
//! A sliding-window bandwidth throttle for peer-to-peer connections.
//!
//! Traffic is counted in one-second slots over a rolling window. Before each
//! read or write the I/O layer asks how long to wait and how many bytes to move
//! next, so the connection (or the whole node) stays under its target speed.
//!
//! ## Quick Example
//!
//! ```rust
//! use net_throttle::{ConnectionThrottle, MonotonicClock, ThrottleConfig};
//!
//! let config = ThrottleConfig::new(64, 10).name("peer-1");
//! let throttle = ConnectionThrottle::with_config(config, MonotonicClock::new()).unwrap();
//!
//! throttle.record_segment(1500).unwrap();
//! let pacing = throttle.pace(4096).unwrap();
//! if !pacing.delay.is_zero() {
//!     println!("sleeping {:?} before the next read", pacing.delay);
//! }
//! println!("next buffer: {} bytes", pacing.next_size);
//! ```

// private modules
mod clock;
mod config;
mod connection;
mod errors;
mod history;
mod registry;
mod throttle;
mod trace_log;

// public API exports
pub use clock::{Clock, ClockError, MonotonicClock};
pub use config::{
    DEFAULT_MAX_SEGMENT, DEFAULT_MIN_SEGMENT, DEFAULT_OVERHEAD_BYTES, DEFAULT_TARGET_SPEED_KBPS,
    DEFAULT_WINDOW_SIZE, ThrottleConfig,
};
pub use connection::{ConnectionThrottle, Pacing};
pub use errors::ThrottleError;
pub use history::{PacketInfo, SLOT_SIZE, TrafficHistory};
pub use registry::{Direction, ThrottleRegistry};
pub use throttle::{ThrottleEngine, ThrottleSnapshot, ThrottleTimes};
pub use trace_log::TrafficLog;
