//! CSV export for simulated hours.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourlySeries;

/// Column header for the hourly CSV export.
const HEADER: &str = "timestamp,outdoor_temp_f,required_heat,capacity_min,capacity_max,\
                       cop_avg,supplemental_heat,electric_kwh";

/// Exports the hourly series to a CSV file at the given path.
///
/// Writes a header row followed by one data row per simulated hour.
/// Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `hourly` - Hourly series of a simulation result
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_hourly_csv(hourly: &HourlySeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_hourly_csv(hourly, buf)
}

/// Writes the hourly series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_hourly_csv(hourly: &HourlySeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for i in 0..hourly.len() {
        wtr.write_record(&[
            hourly.timestamps[i].format("%Y-%m-%d %H:%M").to_string(),
            format!("{:.1}", hourly.outdoor_temp_f[i]),
            format!("{:.2}", hourly.required_heat[i]),
            format!("{:.2}", hourly.capacity_min[i]),
            format!("{:.2}", hourly.capacity_max[i]),
            format!("{:.4}", hourly.cop_avg[i]),
            format!("{:.2}", hourly.supplemental_heat[i]),
            format!("{:.6}", hourly.electric_required[i]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::sim::types::{DispatchCase, HourStep};

    fn series(hours: usize) -> HourlySeries {
        let t0 = NaiveDate::from_ymd_opt(2015, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        let mut s = HourlySeries::with_capacity(hours);
        for h in 0..hours {
            s.push(&HourStep {
                index: h,
                timestamp: t0 + Duration::hours(h as i64),
                outdoor_temp_f: 20.0,
                required_heat: 9000.0,
                capacity_min: 4000.0,
                capacity_max: 7000.0,
                cop_avg: 3.0,
                supplemental_heat: 2000.0,
                electric_kwh: 7000.0 / 3.0 / 3412.0,
                case: DispatchCase::Supplemental,
            });
        }
        s
    }

    #[test]
    fn header_lists_hourly_columns() {
        let mut buf = Vec::new();
        write_hourly_csv(&series(1), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "timestamp,outdoor_temp_f,required_heat,capacity_min,capacity_max,\
             cop_avg,supplemental_heat,electric_kwh"
        );
    }

    #[test]
    fn row_count_matches_hour_count() {
        let mut buf = Vec::new();
        write_hourly_csv(&series(24), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
        assert!(lines[1].starts_with("2015-01-01 00:00,20.0,9000.00"));
    }

    #[test]
    fn deterministic_output() {
        let hourly = series(5);
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_hourly_csv(&hourly, &mut buf1).ok();
        write_hourly_csv(&hourly, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn numeric_columns_parse() {
        let mut buf = Vec::new();
        write_hourly_csv(&series(3), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(8));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            if let Some(rec) = rec {
                for i in 1..8 {
                    let val: Result<f64, _> = rec[i].parse();
                    assert!(val.is_ok(), "column {i} should parse as f64");
                }
            }
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }
}
