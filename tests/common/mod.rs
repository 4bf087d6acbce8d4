//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use smart_energy::devices::{DevicePriorities, DeviceSchedule};
use smart_energy::engine::{EvaluationInput, TemperatureRange};

/// Timestamp on 2024-10-07 at `h:m`.
pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 7)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .expect("valid timestamp")
}

/// Comfort range `[20, 24]`.
pub fn comfort() -> TemperatureRange {
    TemperatureRange::new(20.0, 24.0).expect("valid range")
}

/// Priority mapping from `(name, priority)` pairs in insertion order.
pub fn priorities(pairs: &[(&str, u32)]) -> DevicePriorities {
    DevicePriorities::from_pairs(pairs.iter().copied()).expect("valid priorities")
}

/// Snapshot with threshold 0.20, range `[20, 24]`, and daily limit 30.
///
/// Tweak `price`, `time`, `temperature`, and `used` per test.
pub struct Snapshot {
    pub price: f64,
    pub devices: Vec<(&'static str, u32)>,
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub used: f64,
    pub schedules: Vec<DeviceSchedule>,
}

impl Snapshot {
    pub fn new(devices: &[(&'static str, u32)]) -> Self {
        Self {
            price: 0.15,
            devices: devices.to_vec(),
            time: at(10, 30),
            temperature: 21.5,
            used: 25.0,
            schedules: Vec::new(),
        }
    }

    pub fn input(&self) -> EvaluationInput {
        EvaluationInput::builder()
            .price(self.price, 0.20)
            .priorities(priorities(&self.devices))
            .current_time(self.time)
            .temperature(self.temperature, comfort())
            .energy(self.used, 30.0)
            .schedules(self.schedules.iter().cloned())
            .build()
            .expect("valid input")
    }
}
