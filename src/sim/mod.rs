/// Simulation clock yielding timestamped ticks.
pub mod clock;
pub mod kpi;
/// Seeded price and weather feeds.
pub mod profile;
pub mod runner;
/// Indoor temperature model.
pub mod thermal;
pub mod types;
