//! Common device identity, priority, and state types.

use std::borrow::Borrow;
use std::fmt;

use chrono::NaiveDateTime;

use crate::engine::error::InputError;

/// Unique device name as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device identifier from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the device name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the system role reserved by this name, if any.
    pub fn role(&self) -> Option<SystemRole> {
        SystemRole::from_name(&self.0)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DeviceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<SystemRole> for DeviceId {
    fn from(role: SystemRole) -> Self {
        Self::new(role.name())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Device priority where `1` is critical and anything greater is sheddable.
///
/// # Examples
///
/// ```
/// use smart_energy::devices::Priority;
///
/// assert!(Priority::HIGH.is_high());
/// assert!(Priority::new(3).map(|p| p.is_sheddable()).unwrap_or(false));
/// assert!(Priority::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u32);

impl Priority {
    /// The critical priority level. Never shed for price or usage reasons.
    pub const HIGH: Self = Self(1);

    /// Creates a priority level.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::ZeroPriority`] for `0`.
    pub fn new(value: u32) -> Result<Self, InputError> {
        if value == 0 {
            return Err(InputError::ZeroPriority);
        }
        Ok(Self(value))
    }

    /// Returns the raw priority value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` for the critical level `1`.
    pub fn is_high(self) -> bool {
        self.0 == 1
    }

    /// Returns `true` for any level that load shedding may turn off.
    pub fn is_sheddable(self) -> bool {
        !self.is_high()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary power state decided for a managed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// Maps a boolean condition onto a power state.
    pub fn from_on(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

/// Observable status of a device in an evaluation result.
///
/// `Unmanaged` means no rule touched the device. It is distinct from `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    On,
    Off,
    Unmanaged,
}

impl From<PowerState> for DeviceStatus {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::On => Self::On,
            PowerState::Off => Self::Off,
        }
    }
}

/// Devices whose behaviour is fixed by the engine rather than by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRole {
    /// Switched on below the comfort range.
    Heating,
    /// Switched on above the comfort range.
    Cooling,
    /// Kept on through the night window.
    Security,
    /// Kept on through the night window.
    Refrigerator,
}

impl SystemRole {
    pub const ALL: [Self; 4] = [Self::Heating, Self::Cooling, Self::Security, Self::Refrigerator];

    /// Reserved device name for this role.
    pub fn name(self) -> &'static str {
        match self {
            Self::Heating => "Heating",
            Self::Cooling => "Cooling",
            Self::Security => "Security",
            Self::Refrigerator => "Refrigerator",
        }
    }

    /// Resolves a reserved device name. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }

    /// Returns `true` if the night window must leave this device on.
    pub fn is_night_exempt(self) -> bool {
        matches!(self, Self::Security | Self::Refrigerator)
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request to force a device on at a specific instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSchedule {
    pub device: DeviceId,
    pub at: NaiveDateTime,
}

impl DeviceSchedule {
    pub fn new(device: impl Into<DeviceId>, at: NaiveDateTime) -> Self {
        Self {
            device: device.into(),
            at,
        }
    }
}
