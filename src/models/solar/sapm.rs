//! Sandia Array Performance Model: module parameters, cell temperature,
//! effective irradiance, and the DC maximum-power point.

use serde::Deserialize;

/// Boltzmann constant (J/K).
const BOLTZMANN: f64 = 1.380_66e-23;

/// Elementary charge (C).
const ELEMENTARY_CHARGE: f64 = 1.602_18e-19;

/// Reference cell temperature (°C).
const REFERENCE_TEMP_C: f64 = 25.0;

/// Reference irradiance (W/m²).
const REFERENCE_IRRADIANCE: f64 = 1000.0;

/// Electrical and thermal parameters of one PV module, Sandia model
/// coefficient set.
///
/// Loaded once per run (from TOML or the built-in default) and treated as
/// an immutable lookup record; the simulation never mutates it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SandiaModuleParams {
    /// Rated power at standard test conditions (W).
    pub wp: f64,
    /// Cells in series.
    pub cells_in_series: u32,
    /// Diode ideality factor.
    pub diode_factor: f64,
    /// Thermal model: irradiance coefficient `a` (open-rack glass/polymer).
    pub thermal_a: f64,
    /// Thermal model: wind coefficient `b`.
    pub thermal_b: f64,
    /// Thermal model: conductive temperature delta at reference
    /// irradiance (°C).
    pub thermal_delta_t: f64,
    /// Airmass polynomial coefficients, constant term first.
    pub airmass_coeffs: [f64; 5],
    /// Angle-of-incidence polynomial coefficients, constant term first.
    pub aoi_coeffs: [f64; 6],
    /// Current at maximum power at reference conditions (A).
    pub impo: f64,
    /// Voltage at maximum power at reference conditions (V).
    pub vmpo: f64,
    /// Irradiance dependence of Imp: linear and quadratic terms.
    pub c0: f64,
    /// See [`SandiaModuleParams::c0`].
    pub c1: f64,
    /// Irradiance dependence of Vmp: log and log² terms.
    pub c2: f64,
    /// See [`SandiaModuleParams::c2`].
    pub c3: f64,
    /// Temperature coefficient of Imp (1/°C).
    pub alpha_imp: f64,
    /// Temperature coefficient of Vmp (V/°C).
    pub beta_vmp: f64,
    /// Irradiance dependence of `beta_vmp` (V/°C).
    pub m_beta_vmp: f64,
    /// Fraction of diffuse irradiance used by the module.
    pub diffuse_fraction: f64,
}

impl SandiaModuleParams {
    /// Built-in HIT-type ~200 Wp heterojunction module, open-rack mount.
    pub fn hit_default() -> Self {
        Self {
            wp: 200.0,
            cells_in_series: 66,
            diode_factor: 1.26,
            thermal_a: -3.56,
            thermal_b: -0.075,
            thermal_delta_t: 3.0,
            airmass_coeffs: [0.9281, 0.06615, -0.01384, 0.001298, -4.6e-5],
            aoi_coeffs: [1.0, -2.438e-3, 3.103e-4, -1.246e-5, 2.112e-7, -1.359e-9],
            impo: 5.35,
            vmpo: 38.1,
            c0: 1.0039,
            c1: -0.0039,
            c2: 0.3105,
            c3: -7.8685,
            alpha_imp: -3.0e-4,
            beta_vmp: -0.19,
            m_beta_vmp: 0.0,
            diffuse_fraction: 1.0,
        }
    }

    /// Airmass modifier polynomial `f1`.
    fn airmass_modifier(&self, airmass_absolute: f64) -> f64 {
        polynomial(&self.airmass_coeffs, airmass_absolute)
    }

    /// Angle-of-incidence modifier polynomial `f2` (AOI in degrees).
    fn aoi_modifier(&self, aoi_deg: f64) -> f64 {
        polynomial(&self.aoi_coeffs, aoi_deg)
    }

    /// Effective irradiance (W/m²) reaching the cells after angular and
    /// spectral losses.
    pub fn effective_irradiance(
        &self,
        poa_direct: f64,
        poa_diffuse: f64,
        airmass_absolute: f64,
        aoi_deg: f64,
    ) -> f64 {
        let f1 = self.airmass_modifier(airmass_absolute);
        let f2 = self.aoi_modifier(aoi_deg);
        let se = f1 * (poa_direct * f2 + self.diffuse_fraction * poa_diffuse);
        if se.is_finite() { se.max(0.0) } else { 0.0 }
    }

    /// Cell temperature (°C) from plane-of-array irradiance, ambient
    /// temperature, and wind speed.
    pub fn cell_temperature(&self, poa_global: f64, temp_air_c: f64, wind_speed: f64) -> f64 {
        let module_temp =
            poa_global * (self.thermal_a + self.thermal_b * wind_speed).exp() + temp_air_c;
        module_temp + poa_global / REFERENCE_IRRADIANCE * self.thermal_delta_t
    }

    /// DC power at the maximum-power point (W) for an effective
    /// irradiance and cell temperature. Zero effective irradiance yields
    /// zero power; the result is never negative.
    pub fn dc_power(&self, effective_irradiance: f64, cell_temp_c: f64) -> f64 {
        let ee = effective_irradiance / REFERENCE_IRRADIANCE;
        if ee <= 0.0 {
            return 0.0;
        }

        let dt = cell_temp_c - REFERENCE_TEMP_C;
        let imp =
            (self.impo * (self.c0 * ee + self.c1 * ee * ee) * (1.0 + self.alpha_imp * dt)).max(0.0);

        // Thermal voltage per cell times the diode factor.
        let delta =
            self.diode_factor * BOLTZMANN * (cell_temp_c + 273.15) / ELEMENTARY_CHARGE;
        let ns = f64::from(self.cells_in_series);
        let log_ee = ee.ln();
        let beta_eff = self.beta_vmp + self.m_beta_vmp * (1.0 - ee);
        let vmp = (self.vmpo
            + self.c2 * ns * delta * log_ee
            + self.c3 * ns * (delta * log_ee) * (delta * log_ee)
            + beta_eff * dt)
            .max(0.0);

        imp * vmp
    }
}

/// Evaluates a polynomial with coefficients in ascending-power order.
fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * x + c)
}
