//! Solar PV production model.
//!
//! Per timestep the chain runs: sun position → Erbs GHI decomposition →
//! plane-of-array transposition → cell temperature → airmass and angle of
//! incidence → effective irradiance → SAPM DC maximum-power point →
//! inverter AC conversion, then aggregates over the panel count.

pub mod inverter;
pub mod irradiance;
pub mod position;
pub mod sapm;

use chrono::Datelike;

use crate::series::EnergySeries;
use crate::weather::WeatherSeries;

pub use sapm::SandiaModuleParams;

/// Site coordinates in degrees (latitude positive north, longitude
/// positive east).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// PV plant parameters for one simulation run.
#[derive(Debug, Clone)]
pub struct SolarPlant {
    /// Panel tilt from horizontal (degrees).
    pub tilt_deg: f64,
    /// Panel azimuth clockwise from north (degrees, 180 = south).
    pub azimuth_deg: f64,
    /// Number of installed panels.
    pub num_panels: u32,
    /// Nominal inverter efficiency used to derive the rated DC input.
    pub inverter_efficiency: f64,
    /// Module parameter record shared by all panels.
    pub module: SandiaModuleParams,
}

impl SolarPlant {
    /// Validates the array orientation and inverter parameters before
    /// simulation starts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SimError::InvalidConfiguration`] for a tilt
    /// outside 0..=90°, an azimuth outside 0..=360°, or an inverter
    /// efficiency outside (0, 1].
    pub fn validate(&self) -> Result<(), crate::error::SimError> {
        use crate::error::SimError;
        if !(0.0..=90.0).contains(&self.tilt_deg) {
            return Err(SimError::InvalidConfiguration(format!(
                "panel tilt must be within 0..=90 degrees, got {}",
                self.tilt_deg
            )));
        }
        if !(0.0..=360.0).contains(&self.azimuth_deg) {
            return Err(SimError::InvalidConfiguration(format!(
                "panel azimuth must be within 0..=360 degrees, got {}",
                self.azimuth_deg
            )));
        }
        if !(self.inverter_efficiency > 0.0 && self.inverter_efficiency <= 1.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "inverter efficiency must be in (0, 1], got {}",
                self.inverter_efficiency
            )));
        }
        Ok(())
    }

    /// AC output of a single panel (W) for one weather sample.
    fn panel_power_w(
        &self,
        location: Location,
        timestamp: chrono::DateTime<chrono::Utc>,
        sample: &crate::weather::WeatherSample,
    ) -> f64 {
        if sample.ghi <= 0.0 {
            return 0.0;
        }

        let pos = position::ephemeris(timestamp, location.latitude, location.longitude);
        let day_of_year = timestamp.ordinal();

        let components = irradiance::erbs(sample.ghi, pos.zenith, day_of_year);
        let poa = irradiance::plane_of_array(
            self.tilt_deg,
            self.azimuth_deg,
            pos.zenith,
            pos.azimuth,
            sample.ghi,
            components,
        );
        if poa.global <= 0.0 {
            return 0.0;
        }

        let cell_temp = self
            .module
            .cell_temperature(poa.global, sample.temperature, sample.wind_speed);

        let Some(relative) = irradiance::relative_airmass(pos.apparent_zenith) else {
            // Sun below the horizon but nonzero measured GHI (twilight
            // scatter); the beam path is undefined, so no direct yield.
            return 0.0;
        };
        let airmass = irradiance::absolute_airmass(relative, sample.air_pressure);
        let aoi = irradiance::angle_of_incidence(
            self.tilt_deg,
            self.azimuth_deg,
            pos.zenith,
            pos.azimuth,
        );

        let effective =
            self.module
                .effective_irradiance(poa.direct, poa.diffuse, airmass, aoi);
        let power_dc = self.module.dc_power(effective, cell_temp);
        inverter::ac_from_dc(power_dc, self.module.wp, self.inverter_efficiency)
    }

    /// Computes the aggregate hourly production series (MW).
    pub fn compute(&self, weather: &WeatherSeries, location: Location) -> EnergySeries {
        let panels = f64::from(self.num_panels);
        let values = weather
            .timestamps()
            .iter()
            .zip(weather.samples())
            .map(|(timestamp, sample)| {
                panels * self.panel_power_w(location, *timestamp, sample) / 1e6
            })
            .collect();
        EnergySeries::new(values)
    }
}
