//! End-to-end simulation pipeline.
//!
//! Validates all configuration eagerly, runs the two production models
//! (pure, independent of each other), combines them against demand into
//! residual signals, feeds those through the sequential battery fold, and
//! recomputes the residuals with storage in the loop. All output series
//! share the weather series' hourly index.

use crate::error::SimError;
use crate::models::{Location, SolarPlant, WindPlant};
use crate::series::EnergySeries;
use crate::sim::balance;
use crate::sim::battery::{self, BatteryRatings};
use crate::weather::WeatherSeries;

/// Complete, aligned output of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Aggregate wind production (MW).
    pub wind_production: EnergySeries,
    /// Aggregate PV production (MW).
    pub pv_production: EnergySeries,
    /// Combined production (MW).
    pub production: EnergySeries,
    /// Demand (MW), as supplied.
    pub demand: EnergySeries,
    /// Curtailed energy before storage (MWh).
    pub curtailed: EnergySeries,
    /// Unserved energy before storage (MWh).
    pub unserved: EnergySeries,
    /// Battery state of charge, fraction in [0, 1].
    pub battery_soc: EnergySeries,
    /// Realized battery flow (MWh; positive = charging).
    pub battery_flow: EnergySeries,
    /// Curtailed energy with storage in the loop (MWh).
    pub curtailed_with_storage: EnergySeries,
    /// Unserved energy with storage in the loop (MWh).
    pub unserved_with_storage: EnergySeries,
}

/// Runs the full pipeline for one scenario.
///
/// Every run starts from a fresh battery state; re-running with identical
/// inputs produces identical output.
///
/// # Errors
///
/// Fails fast — before any series is computed — on invalid plant or
/// battery configuration and on a demand series that is not aligned to
/// the weather index. No partial results are returned.
pub fn run(
    weather: &WeatherSeries,
    demand: &EnergySeries,
    wind: &WindPlant,
    solar: &SolarPlant,
    location: Location,
    battery: &BatteryRatings,
) -> Result<SimulationResult, SimError> {
    wind.validate()?;
    solar.validate()?;
    battery.validate()?;
    demand.check_aligned(weather.len(), "demand")?;

    let wind_production = wind.compute(weather);
    let pv_production = solar.compute(weather, location);
    let production = wind_production.add(&pv_production, "pv production")?;

    let pre = balance::residuals(&production, demand)?;
    let dispatch = battery::simulate(&pre.curtailed, &pre.unserved, battery)?;
    let post = balance::residuals_with_storage(&production, demand, &dispatch.flow)?;

    Ok(SimulationResult {
        wind_production,
        pv_production,
        production,
        demand: demand.clone(),
        curtailed: pre.curtailed,
        unserved: pre.unserved,
        battery_soc: dispatch.soc,
        battery_flow: dispatch.flow,
        curtailed_with_storage: post.curtailed,
        unserved_with_storage: post.unserved,
    })
}
