//! Post-hoc report metrics computed from a complete simulation run.

use std::fmt;

use crate::series::EnergySeries;
use crate::sim::pipeline::SimulationResult;

/// Hours in the non-leap reference year used for capacity factors.
const HOURS_PER_YEAR: f64 = 8760.0;

/// Distribution summary of one production series (MW).
#[derive(Debug, Clone, Copy)]
pub struct ProductionStats {
    pub min_mw: f64,
    pub mean_mw: f64,
    pub max_mw: f64,
    pub std_mw: f64,
}

impl ProductionStats {
    fn from_series(series: &EnergySeries) -> Self {
        Self {
            min_mw: series.min(),
            mean_mw: series.mean(),
            max_mw: series.max(),
            std_mw: series.std(),
        }
    }
}

/// Aggregate report for one run: production statistics, capacity factors,
/// full-load hours, and storage effectiveness.
///
/// Computed post-hoc from the pipeline's series so the report always
/// agrees with the exported data.
#[derive(Debug, Clone)]
pub struct KpiReport {
    /// Wind production distribution.
    pub wind: ProductionStats,
    /// PV production distribution.
    pub pv: ProductionStats,
    /// Combined production distribution.
    pub combined: ProductionStats,
    /// Wind capacity factor, fraction.
    pub capacity_factor_wind: f64,
    /// PV capacity factor, fraction.
    pub capacity_factor_pv: f64,
    /// Combined capacity factor, fraction.
    pub capacity_factor_combined: f64,
    /// Wind full-load hours per year.
    pub full_load_hours_wind: f64,
    /// PV full-load hours per year.
    pub full_load_hours_pv: f64,
    /// Total curtailed energy before storage (MWh).
    pub curtailed_mwh: f64,
    /// Total unserved energy before storage (MWh).
    pub unserved_mwh: f64,
    /// Total curtailed energy with storage (MWh).
    pub curtailed_with_storage_mwh: f64,
    /// Total unserved energy with storage (MWh).
    pub unserved_with_storage_mwh: f64,
    /// Curtailment reduction achieved by the battery (percent).
    pub curtailment_reduction_pct: f64,
    /// Unserved-energy reduction achieved by the battery (percent).
    pub unserved_reduction_pct: f64,
}

impl KpiReport {
    /// Computes all metrics from a completed run.
    ///
    /// `capacity_wind_mw` and `capacity_pv_mw` are the installed
    /// capacities (turbines × rated power, panels × watt-peak). A zero
    /// capacity yields a zero capacity factor rather than a division
    /// error.
    pub fn from_result(
        result: &SimulationResult,
        capacity_wind_mw: f64,
        capacity_pv_mw: f64,
    ) -> Self {
        let cf = |energy_mwh: f64, capacity_mw: f64| {
            if capacity_mw > 0.0 {
                energy_mwh / (capacity_mw * HOURS_PER_YEAR)
            } else {
                0.0
            }
        };

        let wind_sum = result.wind_production.sum();
        let pv_sum = result.pv_production.sum();
        let capacity_factor_wind = cf(wind_sum, capacity_wind_mw);
        let capacity_factor_pv = cf(pv_sum, capacity_pv_mw);
        let capacity_factor_combined = cf(wind_sum + pv_sum, capacity_wind_mw + capacity_pv_mw);

        let curtailed_mwh = result.curtailed.sum();
        let unserved_mwh = result.unserved.sum();
        let curtailed_with_storage_mwh = result.curtailed_with_storage.sum();
        let unserved_with_storage_mwh = result.unserved_with_storage.sum();

        Self {
            wind: ProductionStats::from_series(&result.wind_production),
            pv: ProductionStats::from_series(&result.pv_production),
            combined: ProductionStats::from_series(&result.production),
            capacity_factor_wind,
            capacity_factor_pv,
            capacity_factor_combined,
            full_load_hours_wind: capacity_factor_wind * HOURS_PER_YEAR,
            full_load_hours_pv: capacity_factor_pv * HOURS_PER_YEAR,
            curtailed_mwh,
            unserved_mwh,
            curtailed_with_storage_mwh,
            unserved_with_storage_mwh,
            curtailment_reduction_pct: reduction_pct(curtailed_mwh, curtailed_with_storage_mwh),
            unserved_reduction_pct: reduction_pct(unserved_mwh, unserved_with_storage_mwh),
        }
    }
}

/// Percentage by which `with_storage` undercuts `without`; 0 when there
/// was nothing to reduce.
fn reduction_pct(without: f64, with_storage: f64) -> f64 {
    if without > 0.0 {
        (1.0 - with_storage / without) * 100.0
    } else {
        0.0
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Production ---")?;
        for (label, stats) in [
            ("Wind", &self.wind),
            ("Solar PV", &self.pv),
            ("Combined", &self.combined),
        ] {
            writeln!(
                f,
                "{label:<9} min {:.1} MW | mean {:.1} MW | max {:.1} MW | std {:.1} MW",
                stats.min_mw, stats.mean_mw, stats.max_mw, stats.std_mw
            )?;
        }
        writeln!(f, "--- Capacity ---")?;
        writeln!(
            f,
            "Capacity factor:   wind {:.1}% | solar {:.1}% | combined {:.1}%",
            self.capacity_factor_wind * 100.0,
            self.capacity_factor_pv * 100.0,
            self.capacity_factor_combined * 100.0
        )?;
        writeln!(
            f,
            "Full-load hours:   wind {:.0} h | solar {:.0} h",
            self.full_load_hours_wind, self.full_load_hours_pv
        )?;
        writeln!(f, "--- Storage ---")?;
        writeln!(
            f,
            "Curtailed energy:  {:.0} MWh -> {:.0} MWh (-{:.1}%)",
            self.curtailed_mwh, self.curtailed_with_storage_mwh, self.curtailment_reduction_pct
        )?;
        writeln!(
            f,
            "Unserved energy:   {:.0} MWh -> {:.0} MWh (-{:.1}%)",
            self.unserved_mwh, self.unserved_with_storage_mwh, self.unserved_reduction_pct
        )
    }
}
