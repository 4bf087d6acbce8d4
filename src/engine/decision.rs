//! The five-stage device decision pipeline.

use tracing::trace;

use super::night::{self, NightWindow};
use super::schedule::{self, ScheduleMatch};
use super::shedding::{self, ShedPolicy};
use super::types::{EvaluationInput, EvaluationResult};
use super::{climate, price};

/// Tunable rules applied by [`DecisionEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnginePolicy {
    pub night: NightWindow,
    pub shedding: ShedPolicy,
    pub schedule: ScheduleMatch,
}

/// Stateless device decision engine.
///
/// Each call to [`evaluate`](Self::evaluate) runs, in order:
///
/// 1. price: energy-saving mode and the initial device states
/// 2. night: everything off except Security and Refrigerator
/// 3. shedding: daily-cap load reduction
/// 4. climate: Heating and Cooling
/// 5. schedule: forced-on scheduled devices
///
/// Later stages overwrite earlier ones. The engine keeps no state between
/// calls and can be shared across threads.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use smart_energy::devices::DevicePriorities;
/// use smart_energy::engine::{DecisionEngine, EvaluationInput, TemperatureRange};
///
/// let input = EvaluationInput::builder()
///     .price(0.25, 0.20)
///     .priorities(DevicePriorities::from_pairs([("Processor", 1)]).unwrap())
///     .current_time(NaiveDate::from_ymd_opt(2024, 10, 7).unwrap().and_hms_opt(10, 30, 0).unwrap())
///     .temperature(21.5, TemperatureRange::new(20.0, 24.0).unwrap())
///     .energy(25.0, 30.0)
///     .build()
///     .unwrap();
///
/// let result = DecisionEngine::default().evaluate(&input);
/// assert!(result.energy_saving_mode);
/// assert!(result.is_on("Processor"));
/// assert_eq!(result.total_energy_used, 25.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    policy: EnginePolicy,
}

impl DecisionEngine {
    pub fn new(policy: EnginePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Computes device states and status flags for one snapshot.
    pub fn evaluate(&self, input: &EvaluationInput) -> EvaluationResult {
        let energy_saving_mode = price::energy_saving_mode(input.current_price(), input.price_threshold());
        let mut states = price::seed_states(input.priorities(), energy_saving_mode);
        trace!(energy_saving_mode, devices = states.len(), "price stage");

        let night_mode = self.policy.night.contains(input.current_time());
        if night_mode {
            night::apply(&mut states);
            trace!("night stage applied");
        }

        let (total_energy_used, shedding) = shedding::shed(
            &mut states,
            input.priorities(),
            input.energy_used(),
            input.daily_limit(),
            self.policy.shedding,
        );

        let temperature_regulation_active = climate::regulate(
            &mut states,
            input.current_temperature(),
            input.temperature_range(),
        );
        trace!(temperature_regulation_active, "climate stage");

        let scheduled = schedule::apply(
            &mut states,
            input.schedules(),
            input.current_time(),
            self.policy.schedule,
        );
        trace!(scheduled, "schedule stage");

        EvaluationResult {
            energy_saving_mode,
            night_mode,
            devices: states,
            temperature_regulation_active,
            total_energy_used,
            shedding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{DevicePriorities, DeviceSchedule, DeviceStatus};
    use crate::engine::types::{ShedOutcome, TemperatureRange};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 7)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    fn input(pairs: &[(&str, u32)], price: f64, time: NaiveDateTime, used: f64) -> EvaluationInput {
        EvaluationInput::builder()
            .price(price, 0.20)
            .priorities(DevicePriorities::from_pairs(pairs.iter().copied()).expect("valid pairs"))
            .current_time(time)
            .temperature(21.5, TemperatureRange::new(20.0, 24.0).expect("valid range"))
            .energy(used, 30.0)
            .build()
            .expect("valid input")
    }

    #[test]
    fn night_overrides_saving_mode_seed() {
        let input = input(&[("Security", 2), ("Lights", 1)], 0.25, at(1, 0), 10.0);
        let result = DecisionEngine::default().evaluate(&input);
        assert!(result.energy_saving_mode);
        assert!(result.night_mode);
        assert_eq!(result.status("Security"), DeviceStatus::On);
        assert_eq!(result.status("Lights"), DeviceStatus::Off);
    }

    #[test]
    fn night_leaves_nothing_to_shed() {
        let input = input(&[("Lights", 2)], 0.10, at(23, 30), 30.0);
        let result = DecisionEngine::default().evaluate(&input);
        assert_eq!(result.total_energy_used, 30.0);
        assert_eq!(result.shedding, ShedOutcome::LimitUnreachable { shed: vec![] });
    }

    #[test]
    fn schedule_overrides_night() {
        let input = EvaluationInput::builder()
            .priorities(DevicePriorities::from_pairs([("Lights", 2)]).expect("valid pairs"))
            .current_time(at(2, 0))
            .temperature(21.5, TemperatureRange::new(20.0, 24.0).expect("valid range"))
            .energy(0.0, 30.0)
            .schedule(DeviceSchedule::new("Lights", at(2, 0)))
            .build()
            .expect("valid input");
        let result = DecisionEngine::default().evaluate(&input);
        assert!(result.night_mode);
        assert!(result.is_on("Lights"));
    }

    #[test]
    fn custom_night_window_is_respected() {
        let policy = EnginePolicy {
            night: NightWindow::new(22, 7).expect("valid window"),
            ..EnginePolicy::default()
        };
        let input = input(&[("Lights", 2)], 0.10, at(22, 15), 10.0);
        let result = DecisionEngine::new(policy).evaluate(&input);
        assert!(result.night_mode);
        assert!(!result.is_on("Lights"));
    }

    #[test]
    fn heating_and_cooling_always_present() {
        let input = input(&[], 0.10, at(12, 0), 0.0);
        let result = DecisionEngine::default().evaluate(&input);
        assert_eq!(result.status("Heating"), DeviceStatus::Off);
        assert_eq!(result.status("Cooling"), DeviceStatus::Off);
        assert_eq!(result.devices.len(), 2);
    }
}
