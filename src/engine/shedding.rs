use tracing::{debug, warn};

use super::DeviceStates;
use super::types::ShedOutcome;
use crate::devices::{DeviceId, DevicePriorities, PowerState};

/// Usage estimate (kWh) removed from the daily counter per device shed.
pub const SHED_ESTIMATE_KWH: f64 = 1.0;

/// How far load shedding goes once the daily cap is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShedPolicy {
    /// Stop as soon as usage drops below the limit.
    #[default]
    UntilBelowLimit,
    /// Turn off every sheddable device that is on, even past the limit.
    AllSheddable,
}

/// Sheds sheddable devices until usage is under `daily_limit`.
///
/// Candidates are visited in ascending priority value, ties in insertion
/// order. The loop visits each candidate at most once, so it terminates even
/// when only critical devices remain on.
///
/// Returns the remaining usage and what happened.
pub fn shed(
    states: &mut DeviceStates,
    priorities: &DevicePriorities,
    energy_used: f64,
    daily_limit: f64,
    policy: ShedPolicy,
) -> (f64, ShedOutcome) {
    if energy_used < daily_limit {
        return (energy_used, ShedOutcome::NotRequired);
    }

    let mut candidates: Vec<_> = priorities
        .iter()
        .filter(|(_, priority)| priority.is_sheddable())
        .collect();
    // stable: equal priorities keep insertion order
    candidates.sort_by_key(|(_, priority)| *priority);

    let mut usage = energy_used;
    let mut shed: Vec<DeviceId> = Vec::new();
    for (id, _) in candidates {
        if policy == ShedPolicy::UntilBelowLimit && usage < daily_limit {
            break;
        }
        let Some(state) = states.get_mut(id.as_str()) else {
            continue;
        };
        if *state == PowerState::Off {
            continue;
        }
        *state = PowerState::Off;
        usage -= SHED_ESTIMATE_KWH;
        shed.push(id.clone());
    }

    if usage < daily_limit {
        debug!(shed = shed.len(), usage, daily_limit, "load shed below daily limit");
        (usage, ShedOutcome::Reduced { shed })
    } else {
        if shed_fell_short(&shed) {
            warn!(
                shed = shed.len(),
                usage, daily_limit, "daily limit unreachable after shedding every candidate"
            );
        } else {
            debug!(usage, daily_limit, "daily limit reached with nothing left to shed");
        }
        (usage, ShedOutcome::LimitUnreachable { shed })
    }
}

/// Shedding turned devices off and still missed the limit.
fn shed_fell_short(shed: &[DeviceId]) -> bool {
    !shed.is_empty()
}
