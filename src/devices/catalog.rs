use super::types::{DeviceId, Priority};
use crate::engine::error::InputError;

/// Insertion-ordered device → priority mapping with unique names.
///
/// Order matters: load shedding breaks ties between equal priorities by
/// the order devices were inserted.
///
/// # Examples
///
/// ```
/// use smart_energy::devices::{DevicePriorities, Priority};
///
/// let mut devices = DevicePriorities::new();
/// devices.insert("Processor", Priority::HIGH).unwrap();
/// assert!(devices.insert("Processor", Priority::HIGH).is_err());
/// assert_eq!(devices.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePriorities {
    entries: Vec<(DeviceId, Priority)>,
}

impl DevicePriorities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device at the end of the iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::DuplicateDevice`] if the name is already present.
    pub fn insert(&mut self, device: impl Into<DeviceId>, priority: Priority) -> Result<(), InputError> {
        let device = device.into();
        if self.get(device.as_str()).is_some() {
            return Err(InputError::DuplicateDevice(device.to_string()));
        }
        self.entries.push((device, priority));
        Ok(())
    }

    /// Builds a mapping from raw `(name, priority)` pairs.
    ///
    /// # Errors
    ///
    /// Fails on a zero priority or a repeated name.
    pub fn from_pairs<I, N>(pairs: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (N, u32)>,
        N: Into<DeviceId>,
    {
        let mut devices = Self::new();
        for (name, value) in pairs {
            devices.insert(name, Priority::new(value)?)?;
        }
        Ok(devices)
    }

    pub fn get(&self, name: &str) -> Option<Priority> {
        self.entries
            .iter()
            .find_map(|(id, p)| (id.as_str() == name).then_some(*p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DeviceId, Priority)> {
        self.entries.iter().map(|(id, p)| (id, *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
