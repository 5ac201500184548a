//! Demand and day-ahead price CSV loaders.

use std::fs::File;
use std::path::Path;

use crate::error::LoadError;
use crate::series::EnergySeries;

/// Loads an hourly demand series.
///
/// One record per hour in chronological order; the demand value in kW is
/// taken from the last column (a leading timestamp column is tolerated)
/// and normalized to MW. Lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns a [`LoadError`] on I/O failure, malformed CSV, an unparseable
/// value, or an empty file.
pub fn load_demand_csv(path: &Path) -> Result<EnergySeries, LoadError> {
    let values = load_last_column(path)?;
    Ok(EnergySeries::new(
        values.into_iter().map(|kw| kw / 1000.0).collect(),
    ))
}

/// Loads an hourly day-ahead price series (€/MWh).
///
/// Same shape as the demand file: one record per hour, price in the last
/// column, optional leading timestamp column, `#` comments skipped.
///
/// # Errors
///
/// Returns a [`LoadError`] on I/O failure, malformed CSV, an unparseable
/// value, or an empty file.
pub fn load_price_csv(path: &Path) -> Result<EnergySeries, LoadError> {
    Ok(EnergySeries::new(load_last_column(path)?))
}

fn load_last_column(path: &Path) -> Result<Vec<f64>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(File::open(path)?);

    let mut values = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let n = i + 1;
        let raw = record
            .iter()
            .next_back()
            .ok_or_else(|| LoadError::parse(n, "empty record"))?;
        if n == 1 && raw.parse::<f64>().is_err() {
            continue; // header row
        }
        let value = raw
            .parse::<f64>()
            .map_err(|_| LoadError::parse(n, format!("expected number, got `{raw}`")))?;
        values.push(value);
    }

    if values.is_empty() {
        return Err(LoadError::InvalidSeries("no data records".to_string()));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("hybrid-sim-test-{name}"));
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn demand_is_normalized_from_kw_to_mw() {
        let path = write_temp("demand.csv", "8000\n9500\n7200\n");
        let series = load_demand_csv(&path).unwrap();
        assert_eq!(series.values(), &[8.0, 9.5, 7.2]);
    }

    #[test]
    fn price_file_with_timestamp_column_uses_last_column() {
        let path = write_temp(
            "prices.csv",
            "# ENTSO-E day-ahead\n2018-01-01T00:30:00,41.5\n2018-01-01T01:30:00,39.0\n",
        );
        let series = load_price_csv(&path).unwrap();
        assert_eq!(series.values(), &[41.5, 39.0]);
    }

    #[test]
    fn header_row_is_skipped() {
        let path = write_temp("demand-header.csv", "demand_kw\n1000\n2000\n");
        let series = load_demand_csv(&path).unwrap();
        assert_eq!(series.values(), &[1.0, 2.0]);
    }

    #[test]
    fn empty_file_is_rejected() {
        let path = write_temp("empty.csv", "# nothing here\n");
        assert!(matches!(
            load_demand_csv(&path),
            Err(LoadError::InvalidSeries(_))
        ));
    }

    #[test]
    fn garbage_value_is_a_parse_error() {
        let path = write_temp("garbage.csv", "1000\nnot-a-number\n");
        assert!(matches!(
            load_demand_csv(&path),
            Err(LoadError::Parse { record: 2, .. })
        ));
    }
}
