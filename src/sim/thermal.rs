/// Single-zone indoor temperature model.
///
/// Each step closes a fraction of the gap to the outdoor temperature, then
/// applies Heating or Cooling at a fixed rate.
#[derive(Debug, Clone)]
pub struct ThermalZone {
    /// Current indoor temperature (°C).
    pub temperature_c: f64,
    /// Fraction of the indoor/outdoor gap closed per hour (0.0 to 1.0).
    pub leak_rate: f64,
    /// Temperature change per hour of HVAC operation (°C/h).
    pub hvac_delta_c: f64,
}

impl ThermalZone {
    pub fn new(initial_c: f64, leak_rate: f64, hvac_delta_c: f64) -> Self {
        Self {
            temperature_c: initial_c,
            leak_rate: leak_rate.clamp(0.0, 1.0),
            hvac_delta_c: hvac_delta_c.max(0.0),
        }
    }

    /// Advances the zone by `dt_hours` and returns the new temperature.
    pub fn step(&mut self, outdoor_c: f64, heating: bool, cooling: bool, dt_hours: f64) -> f64 {
        let leak = (self.leak_rate * dt_hours).min(1.0);
        self.temperature_c += leak * (outdoor_c - self.temperature_c);
        if heating {
            self.temperature_c += self.hvac_delta_c * dt_hours;
        }
        if cooling {
            self.temperature_c -= self.hvac_delta_c * dt_hours;
        }
        self.temperature_c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drifts_toward_outdoor() {
        let mut zone = ThermalZone::new(20.0, 0.5, 1.0);
        let t = zone.step(10.0, false, false, 1.0);
        assert!((t - 15.0).abs() < 1e-9);
    }

    #[test]
    fn heating_offsets_leak() {
        let mut zone = ThermalZone::new(20.0, 0.0, 2.0);
        assert!((zone.step(0.0, true, false, 0.5) - 21.0).abs() < 1e-9);
        assert!((zone.step(0.0, false, true, 0.5) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn leak_never_overshoots() {
        let mut zone = ThermalZone::new(20.0, 1.0, 0.0);
        let t = zone.step(5.0, false, false, 3.0);
        assert!((t - 5.0).abs() < 1e-9);
    }
}
