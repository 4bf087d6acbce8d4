//! Household runner that feeds fresh snapshots to the decision engine each tick.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use super::clock::{Clock, Tick};
use super::profile::{OutdoorProfile, PriceProfile};
use super::thermal::ThermalZone;
use super::types::{SimConfig, TickRecord};
use crate::config::{ConfigError, ScenarioConfig};
use crate::devices::{DeviceId, DevicePriorities, DeviceSchedule, SystemRole};
use crate::engine::{DecisionEngine, EvaluationInput, InputError, TemperatureRange};

/// Seed offset for the outdoor profile RNG to avoid correlation with prices.
const WEATHER_SEED_OFFSET: u64 = 17;

/// Simulation failure.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid evaluation input: {0}")]
    Input(#[from] InputError),
    #[error("invalid scenario: {} config error(s)", .0.len())]
    Invalid(Vec<ConfigError>),
    #[error("clock overflowed after {produced} of {expected} ticks")]
    ClockOverflow { produced: usize, expected: usize },
}

/// Static description of the managed site.
#[derive(Debug, Clone)]
pub struct Site {
    pub priorities: DevicePriorities,
    pub schedules: Vec<DeviceSchedule>,
    /// Power draw while on (kW), keyed by device name.
    pub loads_kw: BTreeMap<DeviceId, f64>,
    pub comfort: TemperatureRange,
    pub price_threshold: f64,
    pub daily_limit_kwh: f64,
}

impl Site {
    /// Power draw of `device` while on.
    ///
    /// Devices listed in the scenario without a `load_kw` were already given
    /// the 1.0 kW config default. Names the scenario never mentions draw nothing.
    pub fn load_kw(&self, device: &str) -> f64 {
        self.loads_kw.get(device).copied().unwrap_or(0.0)
    }
}

/// Tick-driven household simulation around a [`DecisionEngine`].
///
/// The runner owns everything the engine does not: the daily usage counter,
/// the price and weather feeds, and the indoor temperature.
pub struct Household {
    config: SimConfig,
    engine: DecisionEngine,
    site: Site,
    price: PriceProfile,
    outdoor: OutdoorProfile,
    zone: ThermalZone,
    energy_used_kwh: f64,
    current_day: Option<NaiveDate>,
}

impl Household {
    pub fn new(
        config: SimConfig,
        engine: DecisionEngine,
        site: Site,
        price: PriceProfile,
        outdoor: OutdoorProfile,
        zone: ThermalZone,
    ) -> Self {
        Self {
            config,
            engine,
            site,
            price,
            outdoor,
            zone,
            energy_used_kwh: 0.0,
            current_day: None,
        }
    }

    /// Builds a household from a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Invalid`] with every validation failure.
    pub fn from_scenario(cfg: &ScenarioConfig) -> Result<Self, SimError> {
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(SimError::Invalid(errors));
        }

        let s = &cfg.simulation;
        let config = SimConfig::new(s.start, s.steps_per_day, s.days, s.seed);
        let engine = DecisionEngine::new(cfg.engine_policy()?);

        let mut loads_kw = BTreeMap::new();
        // schedule loads first so an explicit device entry wins
        for sch in &cfg.schedules {
            loads_kw.insert(DeviceId::new(sch.device.as_str()), sch.load_kw);
        }
        for d in &cfg.devices {
            loads_kw.insert(DeviceId::new(d.name.as_str()), d.load_kw);
        }
        loads_kw.insert(DeviceId::from(SystemRole::Heating), cfg.comfort.heating_kw);
        loads_kw.insert(DeviceId::from(SystemRole::Cooling), cfg.comfort.cooling_kw);

        let site = Site {
            priorities: cfg.priorities()?,
            schedules: cfg.device_schedules(),
            loads_kw,
            comfort: cfg.comfort_range()?,
            price_threshold: cfg.engine.price_threshold,
            daily_limit_kwh: cfg.engine.daily_limit_kwh,
        };

        let p = &cfg.price;
        let price = PriceProfile::new(p.base, p.amplitude, p.peak_hour, p.noise_std, s.seed);
        let w = &cfg.weather;
        let outdoor = OutdoorProfile::new(
            w.base_c,
            w.amplitude_c,
            w.coldest_hour,
            w.noise_std,
            s.seed.wrapping_add(WEATHER_SEED_OFFSET),
        );
        let c = &cfg.comfort;
        let zone = ThermalZone::new(c.initial_c, c.leak_rate, c.hvac_delta_c);

        Ok(Self::new(config, engine, site, price, outdoor, zone))
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Daily usage counter carried into the next tick (kWh).
    pub fn energy_used_kwh(&self) -> f64 {
        self.energy_used_kwh
    }

    fn roll_day(&mut self, time: NaiveDateTime) {
        let today = time.date();
        if self.current_day != Some(today) {
            if let Some(previous) = self.current_day {
                info!(%previous, used_kwh = self.energy_used_kwh, "daily usage reset");
            }
            self.current_day = Some(today);
            self.energy_used_kwh = 0.0;
        }
    }

    /// Executes one tick and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Input`] if the feeds produced a non-finite value.
    pub fn step(&mut self, tick: Tick) -> Result<TickRecord, SimError> {
        let dt = self.config.dt_hours;
        self.roll_day(tick.time);

        // 1. Read external signals
        let price = self.price.price_at(tick.time);
        let outdoor_c = self.outdoor.temperature_at(tick.time);
        let indoor_c = self.zone.temperature_c;

        // 2. Build the engine snapshot
        let input = EvaluationInput::builder()
            .price(price, self.site.price_threshold)
            .priorities(self.site.priorities.clone())
            .current_time(tick.time)
            .temperature(indoor_c, self.site.comfort)
            .energy(self.energy_used_kwh, self.site.daily_limit_kwh)
            .schedules(self.site.schedules.iter().cloned())
            .build()?;

        // 3. Decide
        let result = self.engine.evaluate(&input);

        // 4. Charge consumption of everything left on
        let consumed_kwh: f64 = result
            .devices_on()
            .map(|id| self.site.load_kw(id.as_str()) * dt)
            .sum();
        // the engine's post-shed figure is an estimate; the meter only grows
        self.energy_used_kwh += consumed_kwh;

        // 5. Advance indoor temperature
        let heating_on = result.is_on(SystemRole::Heating.name());
        let cooling_on = result.is_on(SystemRole::Cooling.name());
        self.zone.step(outdoor_c, heating_on, cooling_on, dt);

        let schedule_policy = self.engine.policy().schedule;
        let scheduled = self
            .site
            .schedules
            .iter()
            .filter(|s| schedule_policy.matches(s.at, tick.time))
            .count();

        debug!(
            step = tick.step,
            price,
            indoor_c,
            used_kwh = self.energy_used_kwh,
            "tick evaluated"
        );

        Ok(TickRecord {
            timestep: tick.step,
            time: tick.time,
            price,
            outdoor_c,
            indoor_c,
            energy_saving_mode: result.energy_saving_mode,
            night_mode: result.night_mode,
            temperature_regulation_active: result.temperature_regulation_active,
            heating_on,
            cooling_on,
            devices_on: result.devices_on().count(),
            devices_shed: result.shedding.shed().len(),
            limit_unreachable: result.shedding.is_limit_unreachable(),
            scheduled,
            consumed_kwh,
            energy_used_kwh: self.energy_used_kwh,
        })
    }

    /// Executes all ticks and returns the complete record vector.
    ///
    /// # Errors
    ///
    /// Stops at the first failing tick. Returns [`SimError::ClockOverflow`]
    /// if a timestamp past the calendar's range ends the run early.
    pub fn run(&mut self) -> Result<Vec<TickRecord>, SimError> {
        let total = self.config.total_steps();
        let mut clock = Clock::new(self.config.start, self.config.step(), total);
        let mut records = Vec::with_capacity(total);
        while let Some(tick) = clock.tick() {
            records.push(self.step(tick)?);
        }
        if records.len() < total {
            return Err(SimError::ClockOverflow {
                produced: records.len(),
                expected: total,
            });
        }
        info!(ticks = records.len(), "simulation finished");
        Ok(records)
    }
}
