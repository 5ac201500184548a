//! CSV export for simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::sim::pipeline::SimulationResult;

/// Column header for the hourly results export.
const HEADER: &str = "timestamp,wind_mw,pv_mw,production_mw,demand_mw,\
                      curtailed_mwh,unserved_mwh,battery_soc,battery_flow_mwh,\
                      curtailed_with_storage_mwh,unserved_with_storage_mwh";

/// Exports one simulation run to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Timestamps are
/// RFC 3339 UTC; `timestamps` must be the weather index the run was
/// computed on. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(
    result: &SimulationResult,
    timestamps: &[DateTime<Utc>],
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, timestamps, buf)
}

/// Writes one simulation run as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails, including when `timestamps`
/// does not match the result's series length.
pub fn write_csv(
    result: &SimulationResult,
    timestamps: &[DateTime<Utc>],
    writer: impl Write,
) -> io::Result<()> {
    if timestamps.len() != result.production.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} timestamps for {} result rows",
                timestamps.len(),
                result.production.len()
            ),
        ));
    }

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for (t, stamp) in timestamps.iter().enumerate() {
        wtr.write_record(&[
            stamp.to_rfc3339(),
            format!("{:.4}", result.wind_production.values()[t]),
            format!("{:.4}", result.pv_production.values()[t]),
            format!("{:.4}", result.production.values()[t]),
            format!("{:.4}", result.demand.values()[t]),
            format!("{:.4}", result.curtailed.values()[t]),
            format!("{:.4}", result.unserved.values()[t]),
            format!("{:.4}", result.battery_soc.values()[t]),
            format!("{:.4}", result.battery_flow.values()[t]),
            format!("{:.4}", result.curtailed_with_storage.values()[t]),
            format!("{:.4}", result.unserved_with_storage.values()[t]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
