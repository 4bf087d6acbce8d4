use chrono::{NaiveDateTime, TimeDelta};

/// One simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Zero-based step index.
    pub step: usize,
    /// Wall-clock timestamp of the step.
    pub time: NaiveDateTime,
}

/// A simulation clock that yields evenly spaced timestamps.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeDelta, Timelike};
/// use smart_energy::sim::clock::Clock;
///
/// let start = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let mut clock = Clock::new(start, TimeDelta::hours(1), 3);
/// let mut hours = Vec::new();
///
/// clock.run(|tick| hours.push(tick.time.hour()));
/// assert_eq!(hours, vec![0, 1, 2]);
/// ```
pub struct Clock {
    /// Timestamp of step 0
    start: NaiveDateTime,
    /// Spacing between steps
    step: TimeDelta,
    /// Current step of the simulation
    current: usize,
    /// Total steps to run in the simulation
    total: usize,
}

impl Clock {
    /// Creates a new clock.
    ///
    /// # Arguments
    ///
    /// * `start` - Timestamp of the first tick
    /// * `step` - Spacing between ticks
    /// * `total` - The total number of ticks the clock will yield
    pub fn new(start: NaiveDateTime, step: TimeDelta, total: usize) -> Self {
        Self {
            start,
            step,
            current: 0,
            total,
        }
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The tick before advancing
    /// * `None` - If the clock has reached its total steps or the timestamp overflowed
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current >= self.total {
            return None;
        }
        let offset = self.step.checked_mul(i32::try_from(self.current).ok()?)?;
        let time = self.start.checked_add_signed(offset)?;
        let tick = Tick {
            step: self.current,
            time,
        };
        self.current += 1;
        Some(tick)
    }

    /// Runs a function for each remaining tick.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 7)
            .and_then(|d| d.and_hms_opt(22, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn test_tick() {
        let mut clock = Clock::new(start(), TimeDelta::hours(1), 2);
        assert_eq!(clock.tick().map(|t| t.step), Some(0));
        assert_eq!(clock.tick().map(|t| t.time.hour()), Some(23));
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_crosses_midnight() {
        let mut clock = Clock::new(start(), TimeDelta::minutes(90), 3);
        let mut ticks = Vec::new();
        clock.run(|t| ticks.push(t));
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[2].time.hour(), 1);
        assert_eq!(ticks[2].time.date(), start().date().succ_opt().expect("next day"));
    }

    #[test]
    fn test_empty_clock() {
        let mut clock = Clock::new(start(), TimeDelta::hours(1), 0);
        assert_eq!(clock.tick(), None);

        let mut was_called = false;
        clock.run(|_| was_called = true);
        assert!(!was_called);
    }
}
