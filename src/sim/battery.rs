//! Battery dispatch simulation.
//!
//! The one genuinely sequential algorithm in the pipeline: a first-order
//! recurrence over time in which each step's state of charge depends on
//! the previous step's. The recurrence is written as an explicit fold with
//! a [`BatteryState`] accumulator, so the data dependency is visible and
//! the transition function is testable on its own.

use crate::error::SimError;
use crate::series::EnergySeries;

/// Battery system ratings, immutable during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryRatings {
    /// Power port limit in either direction (MW).
    pub power_rating: f64,
    /// Energy capacity (MWh).
    pub energy_rating: f64,
    /// Efficiency factor in (0, 1], applied once to the net signal per
    /// step — not separately per charge/discharge leg. A deliberate
    /// simplification of round-trip losses, preserved exactly.
    pub efficiency: f64,
}

impl BatteryRatings {
    /// Validates the ratings before any simulation work starts.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for a non-positive power
    /// or energy rating or an efficiency outside (0, 1].
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.power_rating > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "battery power rating must be > 0 MW, got {}",
                self.power_rating
            )));
        }
        if !(self.energy_rating > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "battery energy rating must be > 0 MWh, got {}",
                self.energy_rating
            )));
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "battery efficiency must be in (0, 1], got {}",
                self.efficiency
            )));
        }
        Ok(())
    }
}

/// State of charge accumulator threaded through the dispatch fold.
///
/// Owned exclusively by the fold during the sequential pass; a fresh run
/// always starts from [`BatteryState::default`] (empty battery), so
/// re-running with identical inputs is idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryState {
    /// Fraction of energy capacity stored, in [0, 1].
    pub soc: f64,
}

/// SOC trajectory and realized power flow for a dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// State of charge after each interval, in [0, 1].
    pub soc: EnergySeries,
    /// Realized battery flow per interval (MWh; positive = charging).
    pub flow: EnergySeries,
}

/// One step of the SOC recurrence.
///
/// The curtailed/unserved pair is collapsed into a signed net signal
/// (curtailment charges, unserved energy discharges), derated by the
/// efficiency factor, clamped to the power port, integrated into the SOC
/// with the 1-hour step implicit in the hourly grid, and clamped to
/// [0, 1]. The realized flow is recovered from the SOC movement, so it
/// shrinks when the battery saturates.
pub fn step(
    state: BatteryState,
    curtailed: f64,
    unserved: f64,
    ratings: &BatteryRatings,
) -> (BatteryState, f64) {
    let net_signal = ((curtailed - unserved) * ratings.efficiency)
        .clamp(-ratings.power_rating, ratings.power_rating);

    let soc_delta = net_signal / ratings.energy_rating;
    let soc = (state.soc + soc_delta).clamp(0.0, 1.0);
    let flow = (soc - state.soc) * ratings.energy_rating;

    (BatteryState { soc }, flow)
}

/// Simulates battery dispatch over the full curtailed/unserved series.
///
/// Strictly sequential in time (step `t` needs the SOC of step `t − 1`);
/// the fold must not be parallelized across timesteps, though it is
/// independent of the production models.
///
/// # Errors
///
/// Returns [`SimError::InvalidConfiguration`] for bad ratings and
/// [`SimError::MisalignedSeries`] when the two signal series disagree in
/// length.
pub fn simulate(
    curtailed: &EnergySeries,
    unserved: &EnergySeries,
    ratings: &BatteryRatings,
) -> Result<DispatchResult, SimError> {
    ratings.validate()?;
    unserved.check_aligned(curtailed.len(), "unserved")?;

    let mut soc = Vec::with_capacity(curtailed.len());
    let mut flow = Vec::with_capacity(curtailed.len());

    let mut state = BatteryState::default();
    for (c, u) in curtailed.iter().zip(unserved.iter()) {
        let (next, realized) = step(state, *c, *u, ratings);
        soc.push(next.soc);
        flow.push(realized);
        state = next;
    }

    Ok(DispatchResult {
        soc: EnergySeries::new(soc),
        flow: EnergySeries::new(flow),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(power: f64, energy: f64, efficiency: f64) -> BatteryRatings {
        BatteryRatings {
            power_rating: power,
            energy_rating: energy,
            efficiency,
        }
    }

    #[test]
    fn validation_rejects_bad_ratings() {
        assert!(ratings(0.0, 5.0, 0.9).validate().is_err());
        assert!(ratings(5.0, -1.0, 0.9).validate().is_err());
        assert!(ratings(5.0, 5.0, 0.0).validate().is_err());
        assert!(ratings(5.0, 5.0, 1.1).validate().is_err());
        assert!(ratings(5.0, 5.0, 1.0).validate().is_ok());
    }

    #[test]
    fn single_step_charge_from_empty_saturates() {
        // 10 MWh curtailed × 0.9 = 9, clamped to the 5 MW port; 5 MWh into
        // a 5 MWh empty battery fills it exactly, so the realized flow is 5.
        let r = ratings(5.0, 5.0, 0.9);
        let (state, flow) = step(BatteryState::default(), 10.0, 0.0, &r);
        assert_eq!(state.soc, 1.0);
        assert_eq!(flow, 5.0);
    }

    #[test]
    fn realized_flow_shrinks_when_headroom_runs_out() {
        let r = ratings(5.0, 5.0, 1.0);
        // Start half full: 2.5 MWh of headroom against a 5 MW request.
        let (state, flow) = step(BatteryState { soc: 0.5 }, 5.0, 0.0, &r);
        assert_eq!(state.soc, 1.0);
        assert_eq!(flow, 2.5);
    }

    #[test]
    fn discharge_clamps_at_empty() {
        let r = ratings(5.0, 10.0, 1.0);
        let (state, flow) = step(BatteryState { soc: 0.2 }, 0.0, 5.0, &r);
        assert_eq!(state.soc, 0.0);
        assert_eq!(flow, -2.0);
    }

    #[test]
    fn zero_signals_leave_soc_flat_at_zero() {
        let r = ratings(5.0, 5.0, 0.9);
        let curtailed = EnergySeries::zeros(48);
        let unserved = EnergySeries::zeros(48);
        let result = simulate(&curtailed, &unserved, &r).unwrap();
        assert!(result.soc.iter().all(|s| *s == 0.0));
        assert!(result.flow.iter().all(|f| *f == 0.0));
    }

    #[test]
    fn soc_and_flow_stay_within_bounds() {
        let r = ratings(3.0, 6.0, 0.85);
        let curtailed = EnergySeries::new(vec![8.0, 0.0, 2.0, 0.0, 9.0, 1.0, 0.0, 4.0]);
        let unserved = EnergySeries::new(vec![0.0, 5.0, 0.0, 7.0, 0.0, 0.0, 3.0, 0.0]);
        let result = simulate(&curtailed, &unserved, &r).unwrap();
        for (s, f) in result.soc.iter().zip(result.flow.iter()) {
            assert!((0.0..=1.0).contains(s));
            assert!(f.abs() <= r.power_rating + 1e-12);
            assert!((f / r.energy_rating).abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn sustained_surplus_converges_to_full_and_flow_dies() {
        let r = ratings(5.0, 20.0, 0.9);
        let curtailed = EnergySeries::new(vec![10.0; 12]);
        let unserved = EnergySeries::zeros(12);
        let result = simulate(&curtailed, &unserved, &r).unwrap();
        // 5 MW into 20 MWh fills in 4 steps; afterwards SOC holds at 1
        // and the realized flow collapses to 0.
        assert_eq!(result.soc.values()[3], 1.0);
        for t in 4..12 {
            assert_eq!(result.soc.values()[t], 1.0);
            assert_eq!(result.flow.values()[t], 0.0);
        }
    }

    #[test]
    fn runs_are_idempotent() {
        let r = ratings(4.0, 8.0, 0.92);
        let curtailed = EnergySeries::new(vec![1.0, 6.0, 0.0, 3.0, 0.0]);
        let unserved = EnergySeries::new(vec![0.0, 0.0, 5.0, 0.0, 2.0]);
        let a = simulate(&curtailed, &unserved, &r).unwrap();
        let b = simulate(&curtailed, &unserved, &r).unwrap();
        assert_eq!(a.soc, b.soc);
        assert_eq!(a.flow, b.flow);
    }

    #[test]
    fn efficiency_derates_the_net_signal_once() {
        let r = ratings(10.0, 100.0, 0.8);
        let (state, flow) = step(BatteryState::default(), 5.0, 0.0, &r);
        // 5 × 0.8 = 4 MWh stored, not 5 × 0.8² or 5.
        assert_eq!(flow, 4.0);
        assert!((state.soc - 0.04).abs() < 1e-12);
    }

    #[test]
    fn misaligned_signals_are_rejected() {
        let r = ratings(5.0, 5.0, 0.9);
        let curtailed = EnergySeries::zeros(4);
        let unserved = EnergySeries::zeros(3);
        assert!(matches!(
            simulate(&curtailed, &unserved, &r),
            Err(SimError::MisalignedSeries { name: "unserved", .. })
        ));
    }
}
