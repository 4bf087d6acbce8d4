//! Device decision engine: price, night, shedding, climate, and schedule stages.

use std::collections::BTreeMap;

use crate::devices::{DeviceId, PowerState};

mod climate;
pub mod decision;
pub mod error;
/// Night window override.
pub mod night;
mod price;
/// Schedule matching policies.
pub mod schedule;
/// Daily-cap load shedding.
pub mod shedding;
pub mod types;

pub use decision::{DecisionEngine, EnginePolicy};
pub use error::InputError;
pub use night::NightWindow;
pub use schedule::{QuantizedWindow, ScheduleMatch};
pub use shedding::ShedPolicy;
pub use types::{EvaluationInput, EvaluationResult, ShedOutcome, TemperatureRange};

/// Working device states passed between stages.
pub type DeviceStates = BTreeMap<DeviceId, PowerState>;

/// Evaluates `input` with the default policy.
pub fn evaluate(input: &EvaluationInput) -> EvaluationResult {
    DecisionEngine::default().evaluate(input)
}
