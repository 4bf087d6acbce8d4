//! Core simulation types: timing configuration and per-tick records.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

/// Centralized simulation timing.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use smart_energy::sim::types::SimConfig;
///
/// let start = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let cfg = SimConfig::new(start, 24, 1, 42);
/// assert_eq!(cfg.dt_hours, 1.0);
/// assert_eq!(cfg.total_steps(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Timestamp of the first tick.
    pub start: NaiveDateTime,
    /// Number of ticks per day.
    pub steps_per_day: usize,
    /// Number of days to simulate.
    pub days: usize,
    /// Duration of one tick in hours, derived as `24.0 / steps_per_day`.
    pub dt_hours: f64,
    /// Master random seed for reproducibility.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Panics
    ///
    /// Panics if `steps_per_day` or `days` is zero.
    pub fn new(start: NaiveDateTime, steps_per_day: usize, days: usize, seed: u64) -> Self {
        assert!(steps_per_day > 0, "steps_per_day must be > 0");
        assert!(days > 0, "days must be > 0");
        Self {
            start,
            steps_per_day,
            days,
            dt_hours: 24.0 / steps_per_day as f64,
            seed,
        }
    }

    /// Total number of ticks across all days.
    pub fn total_steps(&self) -> usize {
        self.steps_per_day * self.days
    }

    /// Spacing between ticks, rounded down to whole seconds.
    pub fn step(&self) -> TimeDelta {
        TimeDelta::seconds((86_400 / self.steps_per_day) as i64)
    }
}

/// Complete record of one simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    /// Tick index.
    pub timestep: usize,
    /// Wall-clock time of the tick.
    pub time: NaiveDateTime,
    /// Electricity price for the tick.
    pub price: f64,
    /// Outdoor temperature (°C).
    pub outdoor_c: f64,
    /// Indoor temperature fed to the engine (°C).
    pub indoor_c: f64,
    pub energy_saving_mode: bool,
    pub night_mode: bool,
    pub temperature_regulation_active: bool,
    pub heating_on: bool,
    pub cooling_on: bool,
    /// Devices decided on, including Heating and Cooling.
    pub devices_on: usize,
    /// Devices turned off by load shedding.
    pub devices_shed: usize,
    /// Shedding ran out of candidates before reaching the limit.
    pub limit_unreachable: bool,
    /// Schedule entries that matched this tick.
    pub scheduled: usize,
    /// Energy drawn during this tick (kWh).
    pub consumed_kwh: f64,
    /// Daily usage counter after this tick (kWh).
    pub energy_used_kwh: f64,
}

impl fmt::Display for TickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} {} | price={:.3} {} {} | out={:>5.1}C in={:>5.1}C heat={} cool={} | \
             on={:>2} shed={} sched={} | used={:>6.2} kWh (+{:.2})",
            self.timestep,
            self.time.format("%Y-%m-%d %H:%M"),
            self.price,
            if self.energy_saving_mode { "SAVE" } else { "    " },
            if self.night_mode { "NIGHT" } else { "     " },
            self.outdoor_c,
            self.indoor_c,
            self.heating_on,
            self.cooling_on,
            self.devices_on,
            self.devices_shed,
            self.scheduled,
            self.energy_used_kwh,
            self.consumed_kwh,
        )
    }
}
