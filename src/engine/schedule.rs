use chrono::{NaiveDateTime, TimeDelta};

use super::DeviceStates;
use super::error::InputError;
use crate::devices::{DeviceSchedule, PowerState};

/// Quantized matching window for schedule timestamps.
///
/// Both timestamps are truncated to `quantum` and match when the truncated
/// values are at most `tolerance` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizedWindow {
    quantum_secs: i64,
    tolerance_secs: i64,
}

impl QuantizedWindow {
    /// # Errors
    ///
    /// Returns [`InputError::InvalidScheduleWindow`] if `quantum` is not
    /// positive whole seconds or `tolerance` is negative.
    pub fn new(quantum: TimeDelta, tolerance: TimeDelta) -> Result<Self, InputError> {
        let quantum_secs = quantum.num_seconds();
        if quantum_secs <= 0 {
            return Err(InputError::InvalidScheduleWindow(format!(
                "quantum must be at least one second, got {quantum}"
            )));
        }
        if tolerance < TimeDelta::zero() {
            return Err(InputError::InvalidScheduleWindow(format!(
                "tolerance must not be negative, got {tolerance}"
            )));
        }
        Ok(Self {
            quantum_secs,
            tolerance_secs: tolerance.num_seconds(),
        })
    }

    /// Minute resolution with no tolerance.
    pub fn minute() -> Self {
        Self {
            quantum_secs: 60,
            tolerance_secs: 0,
        }
    }

    fn truncate(&self, time: NaiveDateTime) -> i64 {
        let secs = time.and_utc().timestamp();
        secs - secs.rem_euclid(self.quantum_secs)
    }

    pub fn matches(&self, scheduled: NaiveDateTime, now: NaiveDateTime) -> bool {
        (self.truncate(scheduled) - self.truncate(now)).abs() <= self.tolerance_secs
    }
}

/// How a schedule timestamp is compared with the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleMatch {
    /// Full-precision equality.
    #[default]
    Exact,
    Windowed(QuantizedWindow),
}

impl ScheduleMatch {
    pub fn matches(&self, scheduled: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            Self::Exact => scheduled == now,
            Self::Windowed(window) => window.matches(scheduled, now),
        }
    }
}

/// Forces every matching scheduled device on, inserting it if absent.
///
/// Returns how many schedule entries matched.
pub fn apply(
    states: &mut DeviceStates,
    schedules: &[DeviceSchedule],
    now: NaiveDateTime,
    policy: ScheduleMatch,
) -> usize {
    let mut matched = 0;
    for schedule in schedules.iter().filter(|s| policy.matches(s.at, now)) {
        states.insert(schedule.device.clone(), PowerState::On);
        matched += 1;
    }
    matched
}
