//! Smart home energy manager: a stateless device decision engine plus a
//! tick-driven household simulator that exercises it.

/// TOML scenario configuration.
pub mod config;
pub mod devices;
pub mod engine;
pub mod io;
/// Household simulator, clock, feeds, and KPIs.
pub mod sim;
