//! Evaluation input and result snapshots.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::error::InputError;
use crate::devices::{DeviceId, DevicePriorities, DeviceSchedule, DeviceStatus, PowerState};

/// Comfort band `[min, max]` in degrees Celsius.
///
/// Only temperatures strictly outside the band need regulation.
///
/// # Examples
///
/// ```
/// use smart_energy::engine::TemperatureRange;
///
/// let range = TemperatureRange::new(20.0, 24.0).unwrap();
/// assert!(!range.is_below(20.0));
/// assert!(range.is_above(24.5));
/// assert!(TemperatureRange::new(24.0, 20.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    min: f64,
    max: f64,
}

impl TemperatureRange {
    /// Creates a well-ordered range.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidTemperatureRange`] if `min > max` or either
    /// bound is not finite.
    pub fn new(min: f64, max: f64) -> Result<Self, InputError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(InputError::InvalidTemperatureRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_below(&self, temperature: f64) -> bool {
        temperature < self.min
    }

    pub fn is_above(&self, temperature: f64) -> bool {
        temperature > self.max
    }
}

/// Snapshot of everything one evaluation depends on.
///
/// Built through [`EvaluationInput::builder`], which rejects non-finite
/// numbers and missing required fields.
#[derive(Debug, Clone)]
pub struct EvaluationInput {
    current_price: f64,
    price_threshold: f64,
    priorities: DevicePriorities,
    current_time: NaiveDateTime,
    current_temperature: f64,
    temperature_range: TemperatureRange,
    daily_limit: f64,
    energy_used: f64,
    schedules: Vec<DeviceSchedule>,
}

impl EvaluationInput {
    pub fn builder() -> EvaluationInputBuilder {
        EvaluationInputBuilder::default()
    }

    /// Electricity price for the current tick.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Price above which energy-saving mode engages.
    pub fn price_threshold(&self) -> f64 {
        self.price_threshold
    }

    pub fn priorities(&self) -> &DevicePriorities {
        &self.priorities
    }

    pub fn current_time(&self) -> NaiveDateTime {
        self.current_time
    }

    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }

    pub fn temperature_range(&self) -> TemperatureRange {
        self.temperature_range
    }

    /// Daily energy cap (kWh).
    pub fn daily_limit(&self) -> f64 {
        self.daily_limit
    }

    /// Energy consumed so far today (kWh).
    pub fn energy_used(&self) -> f64 {
        self.energy_used
    }

    pub fn schedules(&self) -> &[DeviceSchedule] {
        &self.schedules
    }
}

/// Builder for [`EvaluationInput`].
///
/// `current_time`, `temperature_range`, and `daily_limit` are required. Prices
/// and usage default to `0.0`, devices and schedules to empty.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInputBuilder {
    current_price: f64,
    price_threshold: f64,
    priorities: DevicePriorities,
    current_time: Option<NaiveDateTime>,
    current_temperature: f64,
    temperature_range: Option<TemperatureRange>,
    daily_limit: Option<f64>,
    energy_used: f64,
    schedules: Vec<DeviceSchedule>,
}

impl EvaluationInputBuilder {
    pub fn price(mut self, current_price: f64, threshold: f64) -> Self {
        self.current_price = current_price;
        self.price_threshold = threshold;
        self
    }

    pub fn priorities(mut self, priorities: DevicePriorities) -> Self {
        self.priorities = priorities;
        self
    }

    pub fn current_time(mut self, time: NaiveDateTime) -> Self {
        self.current_time = Some(time);
        self
    }

    pub fn temperature(mut self, current: f64, range: TemperatureRange) -> Self {
        self.current_temperature = current;
        self.temperature_range = Some(range);
        self
    }

    pub fn energy(mut self, used: f64, daily_limit: f64) -> Self {
        self.energy_used = used;
        self.daily_limit = Some(daily_limit);
        self
    }

    pub fn schedule(mut self, schedule: DeviceSchedule) -> Self {
        self.schedules.push(schedule);
        self
    }

    pub fn schedules(mut self, schedules: impl IntoIterator<Item = DeviceSchedule>) -> Self {
        self.schedules.extend(schedules);
        self
    }

    /// Validates and freezes the input.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Missing`] for an absent required field and
    /// [`InputError::NonFinite`] for NaN or infinite numbers.
    pub fn build(self) -> Result<EvaluationInput, InputError> {
        let current_time = self.current_time.ok_or(InputError::Missing { field: "current_time" })?;
        let temperature_range = self
            .temperature_range
            .ok_or(InputError::Missing { field: "temperature_range" })?;
        let daily_limit = self.daily_limit.ok_or(InputError::Missing { field: "daily_limit" })?;

        finite("current_price", self.current_price)?;
        finite("price_threshold", self.price_threshold)?;
        finite("current_temperature", self.current_temperature)?;
        finite("daily_limit", daily_limit)?;
        finite("energy_used", self.energy_used)?;

        Ok(EvaluationInput {
            current_price: self.current_price,
            price_threshold: self.price_threshold,
            priorities: self.priorities,
            current_time,
            current_temperature: self.current_temperature,
            temperature_range,
            daily_limit,
            energy_used: self.energy_used,
            schedules: self.schedules,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NonFinite { field, value })
    }
}

/// Outcome of the daily-cap load shedding stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShedOutcome {
    /// Usage was already below the daily limit.
    NotRequired,
    /// Usage was brought below the limit by turning off `shed`.
    Reduced { shed: Vec<DeviceId> },
    /// Candidates ran out before usage dropped below the limit.
    LimitUnreachable { shed: Vec<DeviceId> },
}

impl ShedOutcome {
    /// Devices turned off by shedding, in the order they were shed.
    pub fn shed(&self) -> &[DeviceId] {
        match self {
            Self::NotRequired => &[],
            Self::Reduced { shed } | Self::LimitUnreachable { shed } => shed,
        }
    }

    pub fn is_limit_unreachable(&self) -> bool {
        matches!(self, Self::LimitUnreachable { .. })
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Price exceeded the threshold.
    pub energy_saving_mode: bool,
    /// Current time fell inside the night window.
    pub night_mode: bool,
    /// Power state of every device some stage decided on.
    pub devices: BTreeMap<DeviceId, PowerState>,
    /// Temperature was strictly outside the comfort range.
    pub temperature_regulation_active: bool,
    /// Daily usage after shedding estimates were subtracted (kWh).
    pub total_energy_used: f64,
    /// What the shedding stage did.
    pub shedding: ShedOutcome,
}

impl EvaluationResult {
    /// Three-state status of a device. Absent devices are `Unmanaged`.
    pub fn status(&self, name: &str) -> DeviceStatus {
        self.devices
            .get(name)
            .map_or(DeviceStatus::Unmanaged, |state| DeviceStatus::from(*state))
    }

    /// Returns `true` only for devices decided `On`.
    pub fn is_on(&self, name: &str) -> bool {
        self.status(name) == DeviceStatus::On
    }

    /// Names of all devices decided `On`.
    pub fn devices_on(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices
            .iter()
            .filter_map(|(id, state)| state.is_on().then_some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 7)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    fn range() -> TemperatureRange {
        TemperatureRange::new(20.0, 24.0).expect("valid range")
    }

    #[test]
    fn temperature_range_rejects_inverted_bounds() {
        let err = TemperatureRange::new(25.0, 20.0).expect_err("inverted");
        assert!(matches!(err, InputError::InvalidTemperatureRange { .. }));
    }

    #[test]
    fn temperature_range_accepts_degenerate_band() {
        let r = TemperatureRange::new(21.0, 21.0).expect("min == max is valid");
        assert!(!r.is_below(21.0));
        assert!(!r.is_above(21.0));
    }

    #[test]
    fn temperature_range_rejects_nan() {
        assert!(TemperatureRange::new(f64::NAN, 24.0).is_err());
    }

    #[test]
    fn builder_requires_time_range_and_limit() {
        let err = EvaluationInput::builder().build().expect_err("missing time");
        assert_eq!(err, InputError::Missing { field: "current_time" });

        let err = EvaluationInput::builder()
            .current_time(noon())
            .temperature(21.0, range())
            .build()
            .expect_err("missing limit");
        assert_eq!(err, InputError::Missing { field: "daily_limit" });
    }

    #[test]
    fn builder_rejects_non_finite_price() {
        let err = EvaluationInput::builder()
            .current_time(noon())
            .temperature(21.0, range())
            .energy(0.0, 30.0)
            .price(f64::NAN, 0.2)
            .build()
            .expect_err("NaN price");
        assert!(matches!(err, InputError::NonFinite { field: "current_price", .. }));
    }

    #[test]
    fn absent_device_is_unmanaged() {
        let result = EvaluationResult {
            energy_saving_mode: false,
            night_mode: false,
            devices: BTreeMap::from([(DeviceId::new("Lights"), PowerState::Off)]),
            temperature_regulation_active: false,
            total_energy_used: 0.0,
            shedding: ShedOutcome::NotRequired,
        };
        assert_eq!(result.status("Lights"), DeviceStatus::Off);
        assert_eq!(result.status("Oven"), DeviceStatus::Unmanaged);
        assert!(!result.is_on("Oven"));
    }
}
