//! Seeded daily price and outdoor temperature profiles.

use std::f64::consts::PI;

use chrono::{NaiveDateTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Gaussian noise via the Box-Muller transform.
///
/// Returns `0.0` without touching the generator when `std_dev <= 0`.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    z0 * std_dev
}

/// Fractional hour of day in `[0, 24)`.
fn hour_of_day(time: NaiveDateTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0 + f64::from(time.second()) / 3600.0
}

/// Cosine day curve equal to `1.0` at `peak_hour` and `-1.0` twelve hours later.
fn daily_wave(time: NaiveDateTime, peak_hour: f64) -> f64 {
    (2.0 * PI * (hour_of_day(time) - peak_hour) / 24.0).cos()
}

/// Electricity price that peaks once a day.
#[derive(Debug, Clone)]
pub struct PriceProfile {
    /// Mean price per kWh
    pub base: f64,
    /// Swing around the mean
    pub amplitude: f64,
    /// Hour of the daily maximum
    pub peak_hour: f64,
    /// Gaussian noise standard deviation
    pub noise_std: f64,
    rng: StdRng,
}

impl PriceProfile {
    pub fn new(base: f64, amplitude: f64, peak_hour: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            base,
            amplitude,
            peak_hour,
            noise_std: noise_std.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Price at `time`. Never negative.
    pub fn price_at(&mut self, time: NaiveDateTime) -> f64 {
        let noise = gaussian_noise(&mut self.rng, self.noise_std);
        (self.base + self.amplitude * daily_wave(time, self.peak_hour) + noise).max(0.0)
    }
}

/// Outdoor temperature with a daily minimum at `coldest_hour`.
#[derive(Debug, Clone)]
pub struct OutdoorProfile {
    /// Mean temperature (°C)
    pub base_c: f64,
    /// Swing around the mean (°C)
    pub amplitude_c: f64,
    /// Hour of the daily minimum
    pub coldest_hour: f64,
    /// Gaussian noise standard deviation (°C)
    pub noise_std: f64,
    rng: StdRng,
}

impl OutdoorProfile {
    pub fn new(base_c: f64, amplitude_c: f64, coldest_hour: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            base_c,
            amplitude_c,
            coldest_hour,
            noise_std: noise_std.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn temperature_at(&mut self, time: NaiveDateTime) -> f64 {
        let noise = gaussian_noise(&mut self.rng, self.noise_std);
        self.base_c - self.amplitude_c * daily_wave(time, self.coldest_hour) + noise
    }
}
