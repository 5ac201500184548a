//! Wind turbine production model.
//!
//! Converts the measured 10 m wind-speed series into aggregate plant output:
//! logarithmic-profile extrapolation to hub height, then a power-curve
//! integration weighted by a Rayleigh speed distribution around the
//! hub-height mean. The distribution-weighted strategy is used (rather than
//! a direct interpolated curve lookup) because it accounts for sub-hourly
//! speed variation around the hourly mean.

use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;

use crate::error::{LoadError, SimError};
use crate::series::EnergySeries;
use crate::weather::WeatherSeries;

/// Air density at sea level (kg/m³).
const AIR_DENSITY: f64 = 1.225;

/// Surface roughness length for the logarithmic wind profile (m).
const ROUGHNESS_LENGTH: f64 = 0.03;

/// Height of the reference wind-speed measurement (m).
const REFERENCE_HEIGHT: f64 = 10.0;

/// Power coefficients of a turbine, tabulated per integer wind speed.
///
/// Index `s` holds the dimensionless coefficient at `s` m/s. Speeds past
/// the tabulated maximum saturate to a coefficient of 0; the curve is
/// never extrapolated. Immutable for the lifetime of a simulation run.
#[derive(Debug, Clone)]
pub struct PowerCurveTable {
    coefficients: Vec<f64>,
}

impl PowerCurveTable {
    /// Builds a table from per-integer-speed coefficients, index 0 first.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] when the table is empty
    /// or contains a negative or non-finite coefficient.
    pub fn new(coefficients: Vec<f64>) -> Result<Self, SimError> {
        if coefficients.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "power curve table is empty".to_string(),
            ));
        }
        for (speed, c) in coefficients.iter().enumerate() {
            if !c.is_finite() || *c < 0.0 {
                return Err(SimError::InvalidConfiguration(format!(
                    "power coefficient at {speed} m/s is {c}"
                )));
            }
        }
        Ok(Self { coefficients })
    }

    /// The default curve: a 7.5 MW class offshore turbine, cut-in around
    /// 3 m/s, peak coefficient near rated speed, cut-out at 25 m/s.
    pub fn default_curve() -> Self {
        Self {
            coefficients: vec![
                0.0, 0.0, 0.0, 0.07, 0.2, 0.33, 0.41, 0.44, 0.45, 0.44, 0.42, 0.36, 0.28, 0.22,
                0.17, 0.13, 0.11, 0.09, 0.07, 0.06, 0.05, 0.04, 0.04, 0.03, 0.03, 0.02,
            ],
        }
    }

    /// Loads a two-column `speed,power_coefficient` CSV (header optional).
    ///
    /// Rows must cover consecutive integer speeds starting at 0.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] on I/O or parse failure, or when speeds are
    /// not the consecutive sequence 0, 1, 2, ...
    pub fn from_csv(path: &Path) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .has_headers(false)
            .comment(Some(b'#'))
            .from_reader(File::open(path)?);

        let mut coefficients = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let n = i + 1;
            if n == 1 && record.get(1).is_some_and(|v| v.parse::<f64>().is_err()) {
                continue; // header row
            }
            let speed = record
                .get(0)
                .and_then(|v| v.parse::<usize>().ok())
                .ok_or_else(|| LoadError::parse(n, "expected integer wind speed"))?;
            if speed != coefficients.len() {
                return Err(LoadError::parse(
                    n,
                    format!("expected speed {}, got {speed}", coefficients.len()),
                ));
            }
            let coefficient = record
                .get(1)
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| LoadError::parse(n, "expected power coefficient"))?;
            coefficients.push(coefficient);
        }
        Self::new(coefficients).map_err(|err| LoadError::InvalidSeries(err.to_string()))
    }

    /// Highest tabulated integer wind speed (m/s).
    pub fn max_speed(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficient at an integer speed; 0 past the tabulated domain.
    pub fn coefficient(&self, speed: usize) -> f64 {
        self.coefficients.get(speed).copied().unwrap_or(0.0)
    }
}

/// Wind plant parameters for one simulation run.
#[derive(Debug, Clone)]
pub struct WindPlant {
    /// Rotor diameter (m).
    pub rotor_diameter: f64,
    /// Hub height above ground (m).
    pub hub_height: f64,
    /// Number of installed turbines.
    pub num_turbines: u32,
    /// Power-curve table shared by all turbines.
    pub power_curve: PowerCurveTable,
}

impl WindPlant {
    /// Validates the plant geometry before simulation starts.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for a non-positive rotor
    /// diameter or hub height, or a hub below the reference measurement
    /// height.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.rotor_diameter > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "rotor diameter must be > 0 m, got {}",
                self.rotor_diameter
            )));
        }
        if !(self.hub_height >= REFERENCE_HEIGHT) {
            return Err(SimError::InvalidConfiguration(format!(
                "hub height must be >= {REFERENCE_HEIGHT} m, got {}",
                self.hub_height
            )));
        }
        Ok(())
    }

    /// Rotor swept area (m²).
    pub fn swept_area(&self) -> f64 {
        PI * (self.rotor_diameter / 2.0) * (self.rotor_diameter / 2.0)
    }

    /// Extrapolates a reference-height speed to hub height using the
    /// logarithmic wind profile with fixed surface roughness.
    pub fn hub_height_speed(&self, reference_speed: f64) -> f64 {
        reference_speed * (self.hub_height / ROUGHNESS_LENGTH).ln()
            / (REFERENCE_HEIGHT / ROUGHNESS_LENGTH).ln()
    }

    /// Expected power of a single turbine (MW) at a hub-height mean speed.
    ///
    /// Treats the hub-height speed as the mean of a Rayleigh distribution
    /// and integrates instantaneous wind power times the tabulated power
    /// coefficient over every integer speed bin in the curve's domain.
    /// A zero mean speed yields zero power.
    pub fn turbine_power_mw(&self, hub_speed: f64) -> f64 {
        let area = self.swept_area();
        let mut power_w = 0.0;
        for speed in 0..=self.power_curve.max_speed() {
            let s = speed as f64;
            let probability = rayleigh_density(s, hub_speed);
            let wind_power = 0.5 * AIR_DENSITY * area * s * s * s;
            power_w += probability * self.power_curve.coefficient(speed) * wind_power;
        }
        power_w / 1e6
    }

    /// Computes the aggregate hourly production series (MW).
    pub fn compute(&self, weather: &WeatherSeries) -> EnergySeries {
        let turbines = f64::from(self.num_turbines);
        let values = weather
            .samples()
            .iter()
            .map(|sample| {
                let hub_speed = self.hub_height_speed(sample.wind_speed);
                turbines * self.turbine_power_mw(hub_speed)
            })
            .collect();
        EnergySeries::new(values)
    }
}

/// Rayleigh probability density at `speed`, parameterized by the mean.
///
/// Returns 0 for a zero (or negative) mean, so calm hours produce no power.
fn rayleigh_density(speed: f64, mean_speed: f64) -> f64 {
    if mean_speed <= 0.0 {
        return 0.0;
    }
    PI * speed / (2.0 * mean_speed * mean_speed)
        * (-PI / 4.0 * (speed / mean_speed) * (speed / mean_speed)).exp()
}
