//! Post-hoc KPI computation from simulation records.

use std::fmt;

use super::types::TickRecord;

/// Aggregate indicators derived from a complete simulation run.
///
/// Computed post-hoc from `Vec<TickRecord>` so reported metrics always agree
/// with the exported ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiReport {
    /// Number of ticks.
    pub ticks: usize,
    /// Total energy drawn (kWh).
    pub energy_consumed_kwh: f64,
    /// Highest daily usage counter seen (kWh).
    pub peak_daily_usage_kwh: f64,
    /// Mean electricity price across ticks.
    pub mean_price: f64,
    /// Price-weighted energy cost.
    pub energy_cost: f64,
    /// Ticks spent in energy-saving mode.
    pub saving_mode_ticks: usize,
    /// Ticks inside the night window.
    pub night_ticks: usize,
    /// Ticks with Heating or Cooling on.
    pub regulation_ticks: usize,
    /// Total devices turned off by load shedding.
    pub devices_shed: usize,
    /// Ticks where shedding could not get under the daily limit.
    pub limit_unreachable_ticks: usize,
    /// Schedule entries that fired.
    pub scheduled_activations: usize,
}

impl KpiReport {
    /// Computes all KPIs from the complete record vector.
    pub fn from_records(records: &[TickRecord]) -> Self {
        let mut report = Self {
            ticks: records.len(),
            energy_consumed_kwh: 0.0,
            peak_daily_usage_kwh: 0.0,
            mean_price: 0.0,
            energy_cost: 0.0,
            saving_mode_ticks: 0,
            night_ticks: 0,
            regulation_ticks: 0,
            devices_shed: 0,
            limit_unreachable_ticks: 0,
            scheduled_activations: 0,
        };
        if records.is_empty() {
            return report;
        }

        let mut price_sum = 0.0;
        for r in records {
            report.energy_consumed_kwh += r.consumed_kwh;
            report.energy_cost += r.consumed_kwh * r.price;
            report.peak_daily_usage_kwh = report.peak_daily_usage_kwh.max(r.energy_used_kwh);
            price_sum += r.price;

            report.saving_mode_ticks += usize::from(r.energy_saving_mode);
            report.night_ticks += usize::from(r.night_mode);
            report.regulation_ticks += usize::from(r.temperature_regulation_active);
            report.devices_shed += r.devices_shed;
            report.limit_unreachable_ticks += usize::from(r.limit_unreachable);
            report.scheduled_activations += r.scheduled;
        }
        report.mean_price = price_sum / records.len() as f64;
        report
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Ticks:                 {}", self.ticks)?;
        writeln!(f, "Energy consumed:       {:.2} kWh", self.energy_consumed_kwh)?;
        writeln!(f, "Peak daily usage:      {:.2} kWh", self.peak_daily_usage_kwh)?;
        writeln!(f, "Mean price:            {:.4}", self.mean_price)?;
        writeln!(f, "Energy cost:           {:.2}", self.energy_cost)?;
        writeln!(f, "Saving mode ticks:     {}", self.saving_mode_ticks)?;
        writeln!(f, "Night ticks:           {}", self.night_ticks)?;
        writeln!(f, "Regulation ticks:      {}", self.regulation_ticks)?;
        writeln!(f, "Devices shed:          {}", self.devices_shed)?;
        writeln!(f, "Limit unreachable:     {}", self.limit_unreachable_ticks)?;
        write!(f, "Scheduled activations: {}", self.scheduled_activations)
    }
}
