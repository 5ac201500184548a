//! Residual energy balance between production and demand.

use crate::error::SimError;
use crate::series::EnergySeries;

/// Curtailed and unserved energy series for one balance pass.
///
/// Per interval at most one of the two is nonzero: both are rectified
/// halves of the same signed net balance.
#[derive(Debug, Clone)]
pub struct ResidualBalance {
    /// Production exceeding demand that cannot be used (MWh).
    pub curtailed: EnergySeries,
    /// Demand exceeding production that cannot be met (MWh).
    pub unserved: EnergySeries,
}

/// Computes per-interval curtailed and unserved energy.
///
/// Pure and elementwise: `curtailed = max(production − demand, 0)`,
/// `unserved = max(demand − production, 0)`.
///
/// # Errors
///
/// Returns [`SimError::MisalignedSeries`] when the series lengths differ.
pub fn residuals(
    production: &EnergySeries,
    demand: &EnergySeries,
) -> Result<ResidualBalance, SimError> {
    demand.check_aligned(production.len(), "demand")?;

    let mut curtailed = Vec::with_capacity(production.len());
    let mut unserved = Vec::with_capacity(production.len());
    for (p, d) in production.iter().zip(demand.iter()) {
        let net = p - d;
        curtailed.push(net.max(0.0));
        unserved.push((-net).max(0.0));
    }
    Ok(ResidualBalance {
        curtailed: EnergySeries::new(curtailed),
        unserved: EnergySeries::new(unserved),
    })
}

/// Recomputes the residual balance with the battery flow folded into the
/// net balance: `production − demand − flow` replaces
/// `production − demand`. Positive flow is charging, which absorbs surplus.
///
/// # Errors
///
/// Returns [`SimError::MisalignedSeries`] when any series length differs.
pub fn residuals_with_storage(
    production: &EnergySeries,
    demand: &EnergySeries,
    flow: &EnergySeries,
) -> Result<ResidualBalance, SimError> {
    demand.check_aligned(production.len(), "demand")?;
    flow.check_aligned(production.len(), "battery flow")?;

    let mut curtailed = Vec::with_capacity(production.len());
    let mut unserved = Vec::with_capacity(production.len());
    for ((p, d), f) in production.iter().zip(demand.iter()).zip(flow.iter()) {
        let net = p - d - f;
        curtailed.push(net.max(0.0));
        unserved.push((-net).max(0.0));
    }
    Ok(ResidualBalance {
        curtailed: EnergySeries::new(curtailed),
        unserved: EnergySeries::new(unserved),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_are_rectified_halves_of_the_net_balance() {
        let production = EnergySeries::new(vec![10.0, 5.0, 7.0]);
        let demand = EnergySeries::new(vec![4.0, 9.0, 7.0]);
        let balance = residuals(&production, &demand).unwrap();
        assert_eq!(balance.curtailed.values(), &[6.0, 0.0, 0.0]);
        assert_eq!(balance.unserved.values(), &[0.0, 4.0, 0.0]);
    }

    #[test]
    fn curtailed_and_unserved_are_mutually_exclusive() {
        let production = EnergySeries::new(vec![3.0, 8.0, 1.5, 0.0, 12.0]);
        let demand = EnergySeries::new(vec![5.0, 2.0, 1.5, 4.0, 0.0]);
        let balance = residuals(&production, &demand).unwrap();
        for (c, u) in balance.curtailed.iter().zip(balance.unserved.iter()) {
            assert!(*c >= 0.0 && *u >= 0.0);
            assert_eq!(c * u, 0.0);
        }
    }

    #[test]
    fn misaligned_demand_is_rejected() {
        let production = EnergySeries::new(vec![1.0, 2.0]);
        let demand = EnergySeries::new(vec![1.0]);
        assert!(matches!(
            residuals(&production, &demand),
            Err(SimError::MisalignedSeries { name: "demand", .. })
        ));
    }

    #[test]
    fn storage_flow_shifts_the_balance() {
        let production = EnergySeries::new(vec![10.0, 2.0]);
        let demand = EnergySeries::new(vec![6.0, 6.0]);
        // Charge 3 MWh in the surplus hour, discharge 2 MWh in the deficit.
        let flow = EnergySeries::new(vec![3.0, -2.0]);
        let balance = residuals_with_storage(&production, &demand, &flow).unwrap();
        assert_eq!(balance.curtailed.values(), &[1.0, 0.0]);
        assert_eq!(balance.unserved.values(), &[0.0, 2.0]);
    }

    #[test]
    fn misaligned_flow_is_rejected() {
        let production = EnergySeries::new(vec![1.0, 2.0]);
        let demand = EnergySeries::new(vec![1.0, 2.0]);
        let flow = EnergySeries::new(vec![0.0]);
        assert!(matches!(
            residuals_with_storage(&production, &demand, &flow),
            Err(SimError::MisalignedSeries {
                name: "battery flow",
                ..
            })
        ));
    }
}
