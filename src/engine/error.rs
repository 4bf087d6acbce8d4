//! Contract violations rejected while building engine inputs.

use thiserror::Error;

/// Input construction error.
///
/// The engine never fails once an input exists; every malformed value is
/// rejected here instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid temperature range: min {min} must be <= max {max} and both finite")]
    InvalidTemperatureRange { min: f64, max: f64 },

    #[error("device priority must be >= 1")]
    ZeroPriority,

    #[error("duplicate device name \"{0}\"")]
    DuplicateDevice(String),

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("invalid night window {start}:00 -> {end}:00: hours must be < 24 and differ")]
    InvalidNightWindow { start: u32, end: u32 },

    #[error("invalid schedule window: {0}")]
    InvalidScheduleWindow(String),
}
