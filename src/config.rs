//! TOML-based scenario configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;
use crate::financial::FinancialInputs;
use crate::models::{Location, PowerCurveTable, SandiaModuleParams, SolarPlant, WindPlant};
use crate::sim::BatteryRatings;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline hybrid-plant scenario
/// (a Dutch coastal site with three 7.5 MW turbines, a 35 MW PV array,
/// and a 5 MW / 5 MWh battery). Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use `ScenarioConfig::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation-wide parameters.
    pub simulation: SimulationConfig,
    /// Site coordinates.
    pub location: LocationConfig,
    /// Wind plant parameters.
    pub wind: WindConfig,
    /// PV plant parameters.
    pub pv: PvConfig,
    /// Battery storage parameters.
    pub battery: BatteryConfig,
    /// Financial assumptions.
    pub financial: FinancialConfig,
}

/// Simulation-wide parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Calendar year the weather file is filtered to; `None` keeps all
    /// records.
    pub year: Option<i32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { year: Some(2018) }
    }
}

/// Site coordinates (degrees; latitude positive north, longitude
/// positive east).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // De Bilt, the Netherlands.
        Self {
            latitude: 52.1,
            longitude: 5.18,
        }
    }
}

/// Wind plant parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindConfig {
    /// Rated power per turbine (MW).
    pub rated_power_mw: f64,
    /// Rotor diameter (m).
    pub rotor_diameter_m: f64,
    /// Hub height (m).
    pub hub_height_m: f64,
    /// Number of installed turbines.
    pub num_turbines: u32,
    /// Optional path to a `speed,power_coefficient` CSV; the built-in
    /// curve is used when absent.
    pub power_curve_csv: Option<String>,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            rated_power_mw: 7.5,
            rotor_diameter_m: 127.0,
            hub_height_m: 135.0,
            num_turbines: 3,
            power_curve_csv: None,
        }
    }
}

/// PV plant parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PvConfig {
    /// Number of installed panels.
    pub num_panels: u32,
    /// Panel tilt from horizontal (degrees).
    pub tilt_deg: f64,
    /// Panel azimuth clockwise from north (degrees, 180 = south).
    pub azimuth_deg: f64,
    /// Nominal inverter efficiency.
    pub inverter_efficiency: f64,
    /// Optional path to a module parameter TOML; the built-in HIT-type
    /// record is used when absent.
    pub module_toml: Option<String>,
}

impl Default for PvConfig {
    fn default() -> Self {
        // 175,000 × 200 Wp panels ≈ 35 MW installed.
        Self {
            num_panels: 175_000,
            tilt_deg: 35.0,
            azimuth_deg: 180.0,
            inverter_efficiency: 0.96,
            module_toml: None,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Power rating (MW).
    pub power_rating_mw: f64,
    /// Energy rating (MWh).
    pub energy_rating_mwh: f64,
    /// Efficiency factor in (0, 1], applied once per step to the net
    /// charge/discharge signal.
    pub efficiency: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            power_rating_mw: 5.0,
            energy_rating_mwh: 5.0,
            efficiency: 0.9,
        }
    }
}

/// Financial assumptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinancialConfig {
    /// Initial investment (million €).
    pub investment_meur: f64,
    /// Discount rate per year, fraction.
    pub discount_rate: f64,
    /// Depreciation period (years).
    pub depreciation_years: u32,
    /// Annual O&M cost (€).
    pub om_cost_eur: f64,
    /// Fixed subsidy price (€/MWh), used when no price series is loaded.
    pub subsidy_price_eur_mwh: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            investment_meur: 62.0,
            discount_rate: 0.07,
            depreciation_years: 20,
            om_cost_eur: 0.0,
            subsidy_price_eur_mwh: 58.0,
        }
    }
}

impl ScenarioConfig {
    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] when the file cannot be
    /// read, the TOML is invalid, or it contains unknown fields.
    pub fn from_toml_file(path: &Path) -> Result<Self, SimError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SimError::InvalidConfiguration(format!("cannot read `{}`: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for invalid TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, SimError> {
        toml::from_str(s).map_err(|e| SimError::InvalidConfiguration(e.to_string()))
    }

    /// Builds the wind plant, resolving the power curve from the
    /// configured CSV or the built-in default.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] when the configured
    /// curve file cannot be loaded or the geometry is invalid.
    pub fn wind_plant(&self) -> Result<WindPlant, SimError> {
        let power_curve = match &self.wind.power_curve_csv {
            Some(path) => PowerCurveTable::from_csv(Path::new(path)).map_err(|e| {
                SimError::InvalidConfiguration(format!("power curve `{path}`: {e}"))
            })?,
            None => PowerCurveTable::default_curve(),
        };
        let plant = WindPlant {
            rotor_diameter: self.wind.rotor_diameter_m,
            hub_height: self.wind.hub_height_m,
            num_turbines: self.wind.num_turbines,
            power_curve,
        };
        plant.validate()?;
        Ok(plant)
    }

    /// Builds the PV plant, resolving the module record from the
    /// configured TOML or the built-in HIT-type default.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] when the module file
    /// cannot be loaded or the orientation is invalid.
    pub fn solar_plant(&self) -> Result<SolarPlant, SimError> {
        let module = match &self.pv.module_toml {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    SimError::InvalidConfiguration(format!("cannot read module `{path}`: {e}"))
                })?;
                toml::from_str::<SandiaModuleParams>(&raw).map_err(|e| {
                    SimError::InvalidConfiguration(format!("module `{path}`: {e}"))
                })?
            }
            None => SandiaModuleParams::hit_default(),
        };
        let plant = SolarPlant {
            tilt_deg: self.pv.tilt_deg,
            azimuth_deg: self.pv.azimuth_deg,
            num_panels: self.pv.num_panels,
            inverter_efficiency: self.pv.inverter_efficiency,
            module,
        };
        plant.validate()?;
        Ok(plant)
    }

    /// Site coordinates as the model-facing value type.
    pub fn location(&self) -> Location {
        Location {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
        }
    }

    /// Battery ratings as the model-facing value type.
    pub fn battery_ratings(&self) -> BatteryRatings {
        BatteryRatings {
            power_rating: self.battery.power_rating_mw,
            energy_rating: self.battery.energy_rating_mwh,
            efficiency: self.battery.efficiency,
        }
    }

    /// Financial inputs as the model-facing value type.
    pub fn financial_inputs(&self) -> FinancialInputs {
        FinancialInputs {
            investment_eur: self.financial.investment_meur * 1e6,
            discount_rate: self.financial.discount_rate,
            depreciation_years: self.financial.depreciation_years,
            om_cost_eur: self.financial.om_cost_eur,
            subsidy_price_eur_mwh: self.financial.subsidy_price_eur_mwh,
        }
    }

    /// Installed wind capacity (MW): turbines × rated power.
    pub fn capacity_wind_mw(&self) -> f64 {
        f64::from(self.wind.num_turbines) * self.wind.rated_power_mw
    }

    /// Installed PV capacity (MW): panels × watt-peak.
    pub fn capacity_pv_mw(&self, module_wp: f64) -> f64 {
        f64::from(self.pv.num_panels) * module_wp / 1e6
    }
}
