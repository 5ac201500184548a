//! Hourly weather observations and the KNMI export loader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::error::LoadError;

/// One hourly weather observation, unit-normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    /// Wind direction in degrees (0 = calm/variable per KNMI convention).
    pub wind_direction: f64,
    /// Wind speed at the 10 m reference height (m/s).
    pub wind_speed: f64,
    /// Air temperature (°C).
    pub temperature: f64,
    /// Global horizontal irradiance (W/m²).
    pub ghi: f64,
    /// Air pressure (Pa).
    pub air_pressure: f64,
}

/// An ordered, gap-free hourly weather series.
///
/// Timestamps are UTC at half past the hour, marking the center of the
/// observation interval. Construction validates non-emptiness and strict
/// one-hour spacing; every derived series in a simulation run is aligned
/// to this index by position.
#[derive(Debug, Clone)]
pub struct WeatherSeries {
    timestamps: Vec<DateTime<Utc>>,
    samples: Vec<WeatherSample>,
}

impl WeatherSeries {
    /// Builds a series from parallel timestamp/sample vectors.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidSeries`] when the vectors are empty,
    /// have different lengths, or the timestamps are not a strict
    /// one-hour grid.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        samples: Vec<WeatherSample>,
    ) -> Result<Self, LoadError> {
        if timestamps.is_empty() {
            return Err(LoadError::InvalidSeries(
                "weather series is empty".to_string(),
            ));
        }
        if timestamps.len() != samples.len() {
            return Err(LoadError::InvalidSeries(format!(
                "{} timestamps but {} samples",
                timestamps.len(),
                samples.len()
            )));
        }
        for (i, pair) in timestamps.windows(2).enumerate() {
            if pair[1] - pair[0] != Duration::hours(1) {
                return Err(LoadError::InvalidSeries(format!(
                    "gap or disorder between {} and {} (records {} and {})",
                    pair[0],
                    pair[1],
                    i + 1,
                    i + 2
                )));
            }
        }
        Ok(Self {
            timestamps,
            samples,
        })
    }

    /// Number of hourly observations.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the series holds no observations (never, by construction).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// UTC timestamps at half past the hour.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// The observations in chronological order.
    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }
}

/// Loads a KNMI hourly export file.
///
/// The format is the KNMI "uurgegevens" CSV: a free-text preamble of
/// `#`-prefixed lines, a header row with whitespace-padded column names,
/// then one record per station-hour. Only the columns `YYYYMMDD`, `HH`,
/// `DD`, `FH`, `T`, `P`, and `Q` are consumed; units are normalized on
/// the way in:
///
/// * `FH` 0.1 m/s → m/s
/// * `T` 0.1 °C → °C
/// * `P` 0.1 hPa → Pa
/// * `Q` J/cm² per hour → W/m²
///
/// `HH` runs 1..=24 with 24 denoting midnight of the following day; the
/// resulting end-of-interval timestamps are shifted back 90 minutes to
/// half past the hour, centering each observation on its interval. When
/// `year` is given, records outside that calendar year (after the shift)
/// are dropped.
///
/// # Errors
///
/// Returns a [`LoadError`] on I/O failure, malformed CSV, unparseable
/// fields, missing columns, or a gapped/empty resulting series.
pub fn load_knmi_csv(path: &Path, year: Option<i32>) -> Result<WeatherSeries, LoadError> {
    let mut raw = String::new();
    File::open(path)?.read_to_string(&mut raw)?;
    parse_knmi(&raw, year)
}

/// Parses KNMI export content from a string. See [`load_knmi_csv`].
pub fn parse_knmi(raw: &str, year: Option<i32>) -> Result<WeatherSeries, LoadError> {
    // Strip the comment preamble; the first non-comment line is the header.
    let data: String = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with('#') && !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader.headers()?.clone();
    let col = |name: &str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::InvalidSeries(format!("missing column `{name}`")))
    };
    let c_date = col("YYYYMMDD")?;
    let c_hour = col("HH")?;
    let c_dir = col("DD")?;
    let c_speed = col("FH")?;
    let c_temp = col("T")?;
    let c_pressure = col("P")?;
    let c_ghi = col("Q")?;

    let mut timestamps = Vec::new();
    let mut samples = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let n = i + 1;
        let field = |idx: usize| -> Result<&str, LoadError> {
            record
                .get(idx)
                .ok_or_else(|| LoadError::parse(n, "record too short"))
        };
        let int_field = |idx: usize| -> Result<i64, LoadError> {
            let raw = field(idx)?;
            raw.parse::<i64>()
                .map_err(|_| LoadError::parse(n, format!("expected integer, got `{raw}`")))
        };

        let date_raw = int_field(c_date)?;
        let hour = int_field(c_hour)?;
        if !(1..=24).contains(&hour) {
            return Err(LoadError::parse(n, format!("hour {hour} outside 1..=24")));
        }

        let date = NaiveDate::from_ymd_opt(
            (date_raw / 10_000) as i32,
            ((date_raw / 100) % 100) as u32,
            (date_raw % 100) as u32,
        )
        .ok_or_else(|| LoadError::parse(n, format!("invalid date `{date_raw}`")))?;

        // Hour h labels the interval ending at h:00; shift the
        // end-of-interval stamp back 90 minutes to half past the hour.
        let end_of_interval =
            Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)) + Duration::hours(hour);
        let timestamp = end_of_interval - Duration::minutes(90);

        if let Some(y) = year
            && timestamp.date_naive().year() != y
        {
            continue;
        }

        samples.push(WeatherSample {
            wind_direction: int_field(c_dir)? as f64,
            wind_speed: int_field(c_speed)? as f64 / 10.0,
            temperature: int_field(c_temp)? as f64 / 10.0,
            ghi: int_field(c_ghi)? as f64 * 100.0 * 100.0 / 60.0 / 60.0,
            air_pressure: int_field(c_pressure)? as f64 * 10.0,
        });
        timestamps.push(timestamp);
    }

    WeatherSeries::new(timestamps, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SAMPLE: &str = "\
# SOURCE: ROYAL NETHERLANDS METEOROLOGICAL INSTITUTE (KNMI)
# FH : Hourly mean wind speed (in 0.1 m/s)
STN,YYYYMMDD,   HH,   DD,   FH,    T,    P,    Q
210,20180101,    1,  200,   80,   52,10213,    0
210,20180101,    2,  210,   90,   50,10215,    0
210,20180101,    3,  220,  100,   49,10216,   12
";

    #[test]
    fn parses_units_and_timestamps() {
        let series = parse_knmi(SAMPLE, None).unwrap();
        assert_eq!(series.len(), 3);

        let first = &series.samples()[0];
        assert_eq!(first.wind_direction, 200.0);
        assert_eq!(first.wind_speed, 8.0);
        assert_eq!(first.temperature, 5.2);
        assert_eq!(first.air_pressure, 102_130.0);
        assert_eq!(first.ghi, 0.0);

        // Hour 1 interval ends 01:00; centered stamp is 23:30 previous day.
        let t0 = series.timestamps()[0];
        assert_eq!(t0.minute(), 30);
        assert_eq!(t0.hour(), 23);
        assert_eq!(t0.date_naive(), NaiveDate::from_ymd_opt(2017, 12, 31).unwrap());

        // 12 J/cm² over one hour is 33.33 W/m².
        let ghi = series.samples()[2].ghi;
        assert!((ghi - 12.0 * 10_000.0 / 3600.0).abs() < 1e-9);
    }

    #[test]
    fn year_filter_drops_out_of_year_records() {
        // The first record centers on 2017-12-31 23:30 and is dropped, which
        // would leave a gap at the front only, so the rest stays contiguous.
        let series = parse_knmi(SAMPLE, Some(2018)).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.timestamps()[0].hour(), 0);
    }

    #[test]
    fn hour_24_rolls_into_next_day() {
        let raw = "\
STN,YYYYMMDD,   HH,   DD,   FH,    T,    P,    Q
210,20180101,   23,  200,   80,   52,10213,    0
210,20180101,   24,  200,   80,   52,10213,    0
210,20180102,    1,  200,   80,   52,10213,    0
";
        let series = parse_knmi(raw, None).unwrap();
        assert_eq!(series.len(), 3);
        let t1 = series.timestamps()[1];
        assert_eq!(t1.date_naive(), NaiveDate::from_ymd_opt(2018, 1, 1).unwrap());
        assert_eq!((t1.hour(), t1.minute()), (22, 30));
    }

    #[test]
    fn gap_is_rejected() {
        let raw = "\
STN,YYYYMMDD,   HH,   DD,   FH,    T,    P,    Q
210,20180101,    1,  200,   80,   52,10213,    0
210,20180101,    3,  220,  100,   49,10216,   12
";
        let err = parse_knmi(raw, None).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSeries(_)));
    }

    #[test]
    fn empty_series_is_rejected() {
        let raw = "STN,YYYYMMDD,   HH,   DD,   FH,    T,    P,    Q\n";
        assert!(matches!(
            parse_knmi(raw, None),
            Err(LoadError::InvalidSeries(_))
        ));
    }

    #[test]
    fn bad_integer_is_a_parse_error() {
        let raw = "\
STN,YYYYMMDD,   HH,   DD,   FH,    T,    P,    Q
210,20180101,    1,  200,   x!,   52,10213,    0
";
        assert!(matches!(parse_knmi(raw, None), Err(LoadError::Parse { .. })));
    }
}
