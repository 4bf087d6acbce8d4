//! Device identities, priorities, and reserved system roles.

/// Insertion-ordered priority mapping.
pub mod catalog;
pub mod types;

pub use catalog::DevicePriorities;
pub use types::{DeviceId, DeviceSchedule, DeviceStatus, PowerState, Priority, SystemRole};
