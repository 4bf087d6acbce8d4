//! Household simulation runs over the built-in presets.

mod common;

use smart_energy::config::{ScenarioConfig, ScheduleConfig};
use smart_energy::sim::kpi::KpiReport;
use smart_energy::sim::runner::{Household, SimError};

fn run(cfg: &ScenarioConfig) -> Vec<smart_energy::sim::types::TickRecord> {
    Household::from_scenario(cfg)
        .expect("valid scenario")
        .run()
        .expect("run succeeds")
}

#[test]
fn same_seed_is_deterministic() {
    let cfg = ScenarioConfig::baseline();
    assert_eq!(run(&cfg), run(&cfg));
}

#[test]
fn different_seed_changes_prices() {
    let a = ScenarioConfig::baseline();
    let mut b = ScenarioConfig::baseline();
    b.simulation.seed = 7;
    let prices_a: Vec<f64> = run(&a).iter().map(|r| r.price).collect();
    let prices_b: Vec<f64> = run(&b).iter().map(|r| r.price).collect();
    assert_ne!(prices_a, prices_b);
}

#[test]
fn night_ticks_follow_the_window() {
    let records = run(&ScenarioConfig::baseline());
    for r in &records {
        let hour = r.timestep as u32;
        assert_eq!(r.night_mode, hour >= 23 || hour < 6, "tick {hour}");
    }
}

#[test]
fn daily_usage_resets_at_midnight() {
    let mut cfg = ScenarioConfig::baseline();
    cfg.simulation.days = 3;
    let records = run(&cfg);
    assert_eq!(records.len(), 72);
    for day in 1..3 {
        let first = &records[day * 24];
        assert!(
            (first.energy_used_kwh - first.consumed_kwh).abs() < 1e-9,
            "day {day} should start from zero usage"
        );
    }
}

#[test]
fn daily_meter_matches_energy_drawn() {
    let cfg = ScenarioConfig::peak_pricing();
    let limit = cfg.engine.daily_limit_kwh;
    let records = run(&cfg);
    assert!(
        records.iter().any(|r| r.energy_used_kwh >= limit),
        "peak pricing should reach its cap"
    );

    for day in records.chunk_by(|a, b| a.time.date() == b.time.date()) {
        let drawn: f64 = day.iter().map(|r| r.consumed_kwh).sum();
        let last = day.last().expect("non-empty day");
        assert!(
            (last.energy_used_kwh - drawn).abs() < 1e-9,
            "meter {:.3} vs drawn {:.3}",
            last.energy_used_kwh,
            drawn
        );
    }
}

#[test]
fn cap_holds_once_reached() {
    let cfg = ScenarioConfig::peak_pricing();
    let limit = cfg.engine.daily_limit_kwh;
    let records = run(&cfg);
    for pair in records.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.time.date() == next.time.date() && prev.energy_used_kwh >= limit {
            assert!(
                next.devices_shed > 0 || next.limit_unreachable,
                "tick {} ran uncapped after the meter passed {limit}",
                next.timestep
            );
        }
    }
}

#[test]
fn cold_snap_keeps_heating_busy() {
    let records = run(&ScenarioConfig::cold_snap());
    assert!(records[0].heating_on, "starts below the comfort band");
    let kpi = KpiReport::from_records(&records);
    assert!(kpi.regulation_ticks > records.len() / 4);
    assert!(records.iter().all(|r| !r.cooling_on));
}

#[test]
fn peak_pricing_saves_more_than_baseline() {
    let baseline = KpiReport::from_records(&run(&ScenarioConfig::baseline()));
    let peak = KpiReport::from_records(&run(&ScenarioConfig::peak_pricing()));
    assert!(peak.saving_mode_ticks > baseline.saving_mode_ticks);
    assert!(peak.mean_price > baseline.mean_price);
}

#[test]
fn tiny_cap_runs_out_of_sheddable_devices() {
    let mut cfg = ScenarioConfig::baseline();
    cfg.engine.daily_limit_kwh = 0.5;
    let kpi = KpiReport::from_records(&run(&cfg));
    assert!(kpi.limit_unreachable_ticks > 0);
    assert!(kpi.devices_shed > 0);
}

#[test]
fn scheduled_device_runs_at_its_slot() {
    let mut cfg = ScenarioConfig::baseline();
    let slot = common::at(23, 0);
    cfg.schedules.push(ScheduleConfig {
        device: "WashingMachine".to_string(),
        at: slot,
        load_kw: 2.0,
    });
    let records = run(&cfg);

    let hit = &records[23];
    assert_eq!(hit.time, slot);
    assert!(hit.night_mode);
    assert_eq!(hit.scheduled, 1);
    assert!(hit.consumed_kwh >= 2.0);
    assert_eq!(records.iter().map(|r| r.scheduled).sum::<usize>(), 1);
}

#[test]
fn invalid_engine_settings_are_reported_together() {
    let mut cfg = ScenarioConfig::baseline();
    cfg.engine.night_start_hour = 30;
    cfg.engine.schedule_match = "fuzzy".to_string();
    cfg.comfort.min_c = 30.0;
    match Household::from_scenario(&cfg) {
        Err(SimError::Invalid(errors)) => assert!(errors.len() >= 3, "{errors:?}"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected validation failure"),
    }
}
