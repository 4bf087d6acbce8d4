//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Deserialize;
use thiserror::Error;

use crate::devices::{DeviceId, DevicePriorities, DeviceSchedule};
use crate::engine::{
    EnginePolicy, NightWindow, QuantizedWindow, ScheduleMatch, ShedPolicy, TemperatureRange,
};

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Decision engine thresholds and policies.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Comfort band and HVAC parameters.
    #[serde(default)]
    pub comfort: ComfortConfig,
    /// Electricity price profile.
    #[serde(default)]
    pub price: PriceConfig,
    /// Outdoor temperature profile.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Managed devices.
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceConfig>,
    /// Forced-on schedule entries.
    #[serde(default)]
    pub schedules: Vec<ScheduleConfig>,
}

/// Simulation timing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// First tick timestamp, e.g. `"2024-10-07T00:00:00"`.
    pub start: NaiveDateTime,
    /// Ticks per simulated day (must divide 1440 so ticks land on whole minutes).
    pub steps_per_day: usize,
    /// Number of days to simulate (must be > 0).
    pub days: usize,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            steps_per_day: 24,
            days: 1,
            seed: 42,
        }
    }
}

fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 7)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Decision engine thresholds and policies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Price above which energy-saving mode engages.
    pub price_threshold: f64,
    /// Daily energy cap (kWh).
    pub daily_limit_kwh: f64,
    /// `"until_below_limit"` or `"all_sheddable"`.
    pub shed_policy: String,
    /// Night window start hour (inclusive).
    pub night_start_hour: u32,
    /// Night window end hour (exclusive).
    pub night_end_hour: u32,
    /// `"exact"` or `"windowed"`.
    pub schedule_match: String,
    /// Truncation quantum for windowed schedule matching (minutes).
    pub schedule_quantum_minutes: i64,
    /// Accepted distance for windowed schedule matching (minutes).
    pub schedule_tolerance_minutes: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price_threshold: 0.20,
            daily_limit_kwh: 30.0,
            shed_policy: "until_below_limit".to_string(),
            night_start_hour: 23,
            night_end_hour: 6,
            schedule_match: "exact".to_string(),
            schedule_quantum_minutes: 1,
            schedule_tolerance_minutes: 0,
        }
    }
}

/// Comfort band and HVAC parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComfortConfig {
    /// Lower comfort bound (°C).
    pub min_c: f64,
    /// Upper comfort bound (°C).
    pub max_c: f64,
    /// Indoor temperature at the first tick (°C).
    pub initial_c: f64,
    /// Heating power draw (kW).
    pub heating_kw: f64,
    /// Cooling power draw (kW).
    pub cooling_kw: f64,
    /// Temperature change per hour of HVAC operation (°C/h).
    pub hvac_delta_c: f64,
    /// Fraction of the indoor/outdoor gap closed per hour (0.0–1.0).
    pub leak_rate: f64,
}

impl Default for ComfortConfig {
    fn default() -> Self {
        Self {
            min_c: 20.0,
            max_c: 24.0,
            initial_c: 21.5,
            heating_kw: 2.0,
            cooling_kw: 1.5,
            hvac_delta_c: 1.5,
            leak_rate: 0.1,
        }
    }
}

/// Electricity price profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Mean price per kWh.
    pub base: f64,
    /// Daily swing around the mean.
    pub amplitude: f64,
    /// Hour of the daily price peak.
    pub peak_hour: f64,
    /// Gaussian noise standard deviation.
    pub noise_std: f64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            base: 0.17,
            amplitude: 0.06,
            peak_hour: 18.0,
            noise_std: 0.01,
        }
    }
}

/// Outdoor temperature profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// Mean outdoor temperature (°C).
    pub base_c: f64,
    /// Daily swing around the mean (°C).
    pub amplitude_c: f64,
    /// Hour of the daily minimum.
    pub coldest_hour: f64,
    /// Gaussian noise standard deviation (°C).
    pub noise_std: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_c: 15.0,
            amplitude_c: 6.0,
            coldest_hour: 5.0,
            noise_std: 0.3,
        }
    }
}

/// One managed device.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub name: String,
    /// `1` is critical, larger values are sheddable.
    pub priority: u32,
    /// Power draw while on (kW).
    #[serde(default = "default_load_kw")]
    pub load_kw: f64,
}

/// One forced-on schedule entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    pub device: String,
    pub at: NaiveDateTime,
    /// Power draw while on (kW), used when the device is not listed in `devices`.
    #[serde(default = "default_load_kw")]
    pub load_kw: f64,
}

fn default_load_kw() -> f64 {
    1.0
}

fn device(name: &str, priority: u32, load_kw: f64) -> DeviceConfig {
    DeviceConfig {
        name: name.to_string(),
        priority,
        load_kw,
    }
}

fn default_devices() -> Vec<DeviceConfig> {
    vec![
        device("Refrigerator", 1, 0.15),
        device("Security", 1, 0.05),
        device("Processor", 1, 0.3),
        device("Lights", 2, 0.4),
        device("Appliances", 3, 1.2),
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"engine.shed_policy"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: mild weather, moderate prices.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            engine: EngineConfig::default(),
            comfort: ComfortConfig::default(),
            price: PriceConfig::default(),
            weather: WeatherConfig::default(),
            devices: default_devices(),
            schedules: Vec::new(),
        }
    }

    /// Returns the peak-pricing preset: expensive evenings and a tight cap.
    pub fn peak_pricing() -> Self {
        Self {
            engine: EngineConfig {
                daily_limit_kwh: 18.0,
                ..EngineConfig::default()
            },
            price: PriceConfig {
                base: 0.22,
                amplitude: 0.12,
                ..PriceConfig::default()
            },
            devices: vec![
                device("Refrigerator", 1, 0.15),
                device("Security", 1, 0.05),
                device("Processor", 1, 0.3),
                device("Lights", 2, 0.4),
                device("Appliances", 3, 1.2),
                device("PoolPump", 4, 1.5),
            ],
            ..Self::baseline()
        }
    }

    /// Returns the cold-snap preset: freezing weather drives the heating.
    pub fn cold_snap() -> Self {
        Self {
            simulation: SimulationConfig {
                days: 2,
                ..SimulationConfig::default()
            },
            comfort: ComfortConfig {
                initial_c: 19.0,
                heating_kw: 3.0,
                leak_rate: 0.2,
                ..ComfortConfig::default()
            },
            weather: WeatherConfig {
                base_c: -4.0,
                amplitude_c: 4.0,
                ..WeatherConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "peak_pricing", "cold_snap"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "peak_pricing" => Ok(Self::peak_pricing()),
            "cold_snap" => Ok(Self::cold_snap()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.steps_per_day == 0 || 1440 % s.steps_per_day != 0 {
            errors.push(ConfigError::new(
                "simulation.steps_per_day",
                "must be > 0 and divide 1440",
            ));
        }
        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }

        let e = &self.engine;
        if let Err(err) = self.shed_policy() {
            errors.push(err);
        }
        if let Err(err) = self.night_window() {
            errors.push(err);
        }
        if let Err(err) = self.schedule_match() {
            errors.push(err);
        }
        if !e.price_threshold.is_finite() {
            errors.push(ConfigError::new("engine.price_threshold", "must be finite"));
        }
        if !(e.daily_limit_kwh.is_finite() && e.daily_limit_kwh > 0.0) {
            errors.push(ConfigError::new("engine.daily_limit_kwh", "must be > 0"));
        }

        let c = &self.comfort;
        if let Err(err) = self.comfort_range() {
            errors.push(err);
        }
        if !c.initial_c.is_finite() {
            errors.push(ConfigError::new("comfort.initial_c", "must be finite"));
        }
        if !(0.0..=1.0).contains(&c.leak_rate) {
            errors.push(ConfigError::new("comfort.leak_rate", "must be in [0.0, 1.0]"));
        }
        if c.heating_kw < 0.0 || c.cooling_kw < 0.0 || c.hvac_delta_c < 0.0 {
            errors.push(ConfigError::new(
                "comfort",
                "heating_kw, cooling_kw and hvac_delta_c must be >= 0",
            ));
        }

        if self.price.noise_std < 0.0 {
            errors.push(ConfigError::new("price.noise_std", "must be >= 0"));
        }
        if self.weather.noise_std < 0.0 {
            errors.push(ConfigError::new("weather.noise_std", "must be >= 0"));
        }

        if let Err(err) = self.priorities() {
            errors.push(err);
        }
        for (i, d) in self.devices.iter().enumerate() {
            if d.load_kw < 0.0 {
                errors.push(ConfigError::new(format!("devices[{i}].load_kw"), "must be >= 0"));
            }
        }
        for (i, sch) in self.schedules.iter().enumerate() {
            if sch.device.is_empty() {
                errors.push(ConfigError::new(format!("schedules[{i}].device"), "must not be empty"));
            }
            if sch.load_kw < 0.0 {
                errors.push(ConfigError::new(format!("schedules[{i}].load_kw"), "must be >= 0"));
            }
        }

        errors
    }

    /// Resolves the configured shed policy.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown policy name.
    pub fn shed_policy(&self) -> Result<ShedPolicy, ConfigError> {
        match self.engine.shed_policy.as_str() {
            "until_below_limit" => Ok(ShedPolicy::UntilBelowLimit),
            "all_sheddable" => Ok(ShedPolicy::AllSheddable),
            other => Err(ConfigError::new(
                "engine.shed_policy",
                format!("must be \"until_below_limit\" or \"all_sheddable\", got \"{other}\""),
            )),
        }
    }

    /// Resolves the configured night window.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the hours are out of range or equal.
    pub fn night_window(&self) -> Result<NightWindow, ConfigError> {
        let e = &self.engine;
        NightWindow::new(e.night_start_hour, e.night_end_hour).map_err(|err| {
            let field = if e.night_start_hour < 24 && e.night_end_hour >= 24 {
                "engine.night_end_hour"
            } else {
                "engine.night_start_hour"
            };
            ConfigError::new(field, err.to_string())
        })
    }

    /// Resolves the configured schedule matching policy.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown mode or an invalid window.
    pub fn schedule_match(&self) -> Result<ScheduleMatch, ConfigError> {
        let e = &self.engine;
        match e.schedule_match.as_str() {
            "exact" => Ok(ScheduleMatch::Exact),
            "windowed" => {
                let minutes = |field: &str, value: i64| {
                    TimeDelta::try_minutes(value)
                        .ok_or_else(|| ConfigError::new(field, format!("{value} minutes is out of range")))
                };
                let quantum = minutes("engine.schedule_quantum_minutes", e.schedule_quantum_minutes)?;
                let tolerance =
                    minutes("engine.schedule_tolerance_minutes", e.schedule_tolerance_minutes)?;
                QuantizedWindow::new(quantum, tolerance)
                    .map(ScheduleMatch::Windowed)
                    .map_err(|err| {
                        let field = if e.schedule_quantum_minutes <= 0 {
                            "engine.schedule_quantum_minutes"
                        } else {
                            "engine.schedule_tolerance_minutes"
                        };
                        ConfigError::new(field, err.to_string())
                    })
            }
            other => Err(ConfigError::new(
                "engine.schedule_match",
                format!("must be \"exact\" or \"windowed\", got \"{other}\""),
            )),
        }
    }

    /// Assembles the full engine policy.
    ///
    /// # Errors
    ///
    /// Returns the first invalid policy field.
    pub fn engine_policy(&self) -> Result<EnginePolicy, ConfigError> {
        Ok(EnginePolicy {
            night: self.night_window()?,
            shedding: self.shed_policy()?,
            schedule: self.schedule_match()?,
        })
    }

    /// Resolves the comfort band.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `min_c > max_c` or a bound is not finite.
    pub fn comfort_range(&self) -> Result<TemperatureRange, ConfigError> {
        TemperatureRange::new(self.comfort.min_c, self.comfort.max_c)
            .map_err(|e| ConfigError::new("comfort.min_c", e.to_string()))
    }

    /// Builds the device priority mapping in configuration order.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero priority or a duplicate name.
    pub fn priorities(&self) -> Result<DevicePriorities, ConfigError> {
        DevicePriorities::from_pairs(self.devices.iter().map(|d| (d.name.as_str(), d.priority)))
            .map_err(|e| ConfigError::new("devices", e.to_string()))
    }

    /// Builds the schedule entries.
    pub fn device_schedules(&self) -> Vec<DeviceSchedule> {
        self.schedules
            .iter()
            .map(|s| DeviceSchedule::new(DeviceId::new(s.device.as_str()), s.at))
            .collect()
    }
}
