use super::DeviceStates;
use crate::devices::{DevicePriorities, PowerState};

/// Returns `true` when the price strictly exceeds the threshold.
pub fn energy_saving_mode(current_price: f64, threshold: f64) -> bool {
    current_price > threshold
}

/// Seeds device states from the priority mapping.
///
/// In saving mode only critical devices stay on; otherwise everything is on.
pub fn seed_states(priorities: &DevicePriorities, saving: bool) -> DeviceStates {
    priorities
        .iter()
        .map(|(id, priority)| (id.clone(), PowerState::from_on(!saving || priority.is_high())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> DevicePriorities {
        DevicePriorities::from_pairs([("Processor", 1), ("Lights", 2), ("Appliances", 3)])
            .expect("valid pairs")
    }

    #[test]
    fn equal_price_does_not_trigger_saving() {
        assert!(!energy_saving_mode(0.20, 0.20));
        assert!(energy_saving_mode(0.25, 0.20));
    }

    #[test]
    fn saving_mode_keeps_only_high_priority() {
        let states = seed_states(&devices(), true);
        assert_eq!(states.get("Processor"), Some(&PowerState::On));
        assert_eq!(states.get("Lights"), Some(&PowerState::Off));
        assert_eq!(states.get("Appliances"), Some(&PowerState::Off));
    }

    #[test]
    fn normal_mode_turns_everything_on() {
        let states = seed_states(&devices(), false);
        assert!(states.values().all(|s| s.is_on()));
        assert_eq!(states.len(), 3);
    }
}
