use super::DeviceStates;
use super::types::TemperatureRange;
use crate::devices::{DeviceId, PowerState, SystemRole};

/// Sets Heating and Cooling from the current temperature.
///
/// Returns `true` when either is needed. Both devices are always written.
pub fn regulate(states: &mut DeviceStates, temperature: f64, range: TemperatureRange) -> bool {
    let heating = range.is_below(temperature);
    let cooling = range.is_above(temperature);
    states.insert(DeviceId::from(SystemRole::Heating), PowerState::from_on(heating));
    states.insert(DeviceId::from(SystemRole::Cooling), PowerState::from_on(cooling));
    heating || cooling
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> TemperatureRange {
        TemperatureRange::new(20.0, 24.0).expect("valid range")
    }

    fn run(temperature: f64) -> (bool, DeviceStates) {
        let mut states = DeviceStates::new();
        let active = regulate(&mut states, temperature, range());
        (active, states)
    }

    #[test]
    fn heats_below_min() {
        let (active, states) = run(19.0);
        assert!(active);
        assert_eq!(states.get("Heating"), Some(&PowerState::On));
        assert_eq!(states.get("Cooling"), Some(&PowerState::Off));
    }

    #[test]
    fn cools_above_max() {
        let (active, states) = run(25.0);
        assert!(active);
        assert_eq!(states.get("Heating"), Some(&PowerState::Off));
        assert_eq!(states.get("Cooling"), Some(&PowerState::On));
    }

    #[test]
    fn bounds_are_comfortable() {
        for t in [20.0, 21.5, 24.0] {
            let (active, states) = run(t);
            assert!(!active, "{t} should not regulate");
            assert_eq!(states.get("Heating"), Some(&PowerState::Off));
            assert_eq!(states.get("Cooling"), Some(&PowerState::Off));
        }
    }
}
