// src/errors.rs

// error handling for the throttle types

// dependencies
use thiserror::Error;

use crate::clock::ClockError;

/// Error type for throttle configuration and clock issues.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ThrottleError {
    #[error("Target speed must be positive")]
    InvalidTargetSpeed, // for target speed == 0
    #[error("Window size must be at least one slot")]
    InvalidWindowSize, // for window_size == 0
    #[error("Minimum segment must not exceed a non-zero maximum segment")]
    InvalidSegmentBounds, // for min_segment > max_segment or max_segment == 0
    #[error("Clock error occurred: {0}")]
    ClockError(#[from] ClockError), // error variant for issues with the clock
}
