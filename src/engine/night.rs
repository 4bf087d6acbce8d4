use chrono::{NaiveDateTime, Timelike};

use super::DeviceStates;
use super::error::InputError;
use crate::devices::PowerState;

/// Half-open hour window `[start, end)` that may wrap past midnight.
///
/// # Examples
///
/// ```
/// use smart_energy::engine::NightWindow;
///
/// let night = NightWindow::default();
/// assert!(night.contains_hour(23));
/// assert!(night.contains_hour(5));
/// assert!(!night.contains_hour(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    start_hour: u32,
    end_hour: u32,
}

impl NightWindow {
    /// Creates a window from `start_hour` (inclusive) to `end_hour` (exclusive).
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidNightWindow`] if either hour is >= 24 or
    /// both are equal.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, InputError> {
        if start_hour >= 24 || end_hour >= 24 || start_hour == end_hour {
            return Err(InputError::InvalidNightWindow {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.contains_hour(time.hour())
    }
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start_hour: 23,
            end_hour: 6,
        }
    }
}

/// Forces every device off except the night-exempt system roles, which are
/// forced on.
pub fn apply(states: &mut DeviceStates) {
    for (id, state) in states.iter_mut() {
        let exempt = id.role().is_some_and(|role| role.is_night_exempt());
        *state = PowerState::from_on(exempt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DeviceId;

    #[test]
    fn default_window_covers_23_to_6() {
        let night = NightWindow::default();
        let inside: Vec<u32> = (0..24).filter(|h| night.contains_hour(*h)).collect();
        assert_eq!(inside, vec![0, 1, 2, 3, 4, 5, 23]);
    }

    #[test]
    fn non_wrapping_window() {
        let siesta = NightWindow::new(13, 15).expect("valid window");
        assert!(!siesta.contains_hour(12));
        assert!(siesta.contains_hour(13));
        assert!(siesta.contains_hour(14));
        assert!(!siesta.contains_hour(15));
    }

    #[test]
    fn rejects_empty_or_out_of_range_windows() {
        assert!(NightWindow::new(6, 6).is_err());
        assert!(NightWindow::new(24, 6).is_err());
        assert!(NightWindow::new(23, 30).is_err());
    }

    #[test]
    fn exempt_roles_are_forced_on() {
        let mut states = DeviceStates::from([
            (DeviceId::new("Lights"), PowerState::On),
            (DeviceId::new("Security"), PowerState::Off),
            (DeviceId::new("Refrigerator"), PowerState::On),
        ]);
        apply(&mut states);
        assert_eq!(states.get("Lights"), Some(&PowerState::Off));
        assert_eq!(states.get("Security"), Some(&PowerState::On));
        assert_eq!(states.get("Refrigerator"), Some(&PowerState::On));
    }
}
