//! CSV export for simulation tick records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::TickRecord;

/// Column header for CSV telemetry export.
const HEADER: &str = "timestep,time,price,outdoor_c,indoor_c,energy_saving_mode,\
                       night_mode,regulation_active,heating_on,cooling_on,\
                       devices_on,devices_shed,limit_unreachable,scheduled,\
                       consumed_kwh,energy_used_kwh";

/// Exports tick records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[TickRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes tick records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[TickRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.timestep.to_string(),
            r.time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            format!("{:.4}", r.price),
            format!("{:.2}", r.outdoor_c),
            format!("{:.2}", r.indoor_c),
            r.energy_saving_mode.to_string(),
            r.night_mode.to_string(),
            r.temperature_regulation_active.to_string(),
            r.heating_on.to_string(),
            r.cooling_on.to_string(),
            r.devices_on.to_string(),
            r.devices_shed.to_string(),
            r.limit_unreachable.to_string(),
            r.scheduled.to_string(),
            format!("{:.4}", r.consumed_kwh),
            format!("{:.4}", r.energy_used_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_tick(t: usize) -> TickRecord {
        TickRecord {
            timestep: t,
            time: NaiveDate::from_ymd_opt(2024, 10, 7)
                .and_then(|d| d.and_hms_opt(t as u32, 0, 0))
                .expect("valid timestamp"),
            price: 0.18,
            outdoor_c: 12.5,
            indoor_c: 21.0,
            energy_saving_mode: false,
            night_mode: t < 6,
            temperature_regulation_active: false,
            heating_on: false,
            cooling_on: false,
            devices_on: 4,
            devices_shed: 0,
            limit_unreachable: false,
            scheduled: 0,
            consumed_kwh: 1.25,
            energy_used_kwh: 1.25 * (t + 1) as f64,
        }
    }

    fn render(records: &[TickRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(records, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_lists_all_columns() {
        let output = render(&[make_tick(0)]);
        let first_line = output.lines().next().unwrap_or("");
        assert!(first_line.starts_with("timestep,time,price,"));
        assert_eq!(first_line.split(',').count(), 16);
    }

    #[test]
    fn row_count_matches_tick_count() {
        let records: Vec<TickRecord> = (0..24).map(make_tick).collect();
        assert_eq!(render(&records).lines().count(), 25);
    }

    #[test]
    fn rows_are_parseable() {
        let records: Vec<TickRecord> = (0..3).map(make_tick).collect();
        let csv_text = render(&records);

        let mut rdr = csv::ReaderBuilder::new().from_reader(csv_text.as_bytes());
        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            assert!(rec[2].parse::<f64>().is_ok(), "price should parse as f64");
            assert!(rec[6].parse::<bool>().is_ok(), "night_mode should parse as bool");
            assert!(rec[15].parse::<f64>().is_ok(), "energy_used_kwh should parse as f64");
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }
}
