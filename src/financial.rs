//! Financial metrics derived from the production series.
//!
//! Assumes every future year repeats the simulated year's production and
//! prices. Revenue can follow an hourly day-ahead price series or a fixed
//! subsidy price per MWh.

use std::fmt;

use crate::error::SimError;
use crate::series::EnergySeries;

/// Financial assumptions for one run, immutable once validated.
#[derive(Debug, Clone, Copy)]
pub struct FinancialInputs {
    /// Initial investment (€).
    pub investment_eur: f64,
    /// Discount rate per year, fraction.
    pub discount_rate: f64,
    /// Depreciation period (years).
    pub depreciation_years: u32,
    /// Annual operations and maintenance cost (€).
    pub om_cost_eur: f64,
    /// Fixed subsidy price (€/MWh), used when no price series is given.
    pub subsidy_price_eur_mwh: f64,
}

impl FinancialInputs {
    /// Validates the assumptions before metric computation.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for a non-positive
    /// investment or depreciation period, or a discount rate outside
    /// (0, 1).
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.investment_eur > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "investment must be > 0, got {}",
                self.investment_eur
            )));
        }
        if !(self.discount_rate > 0.0 && self.discount_rate < 1.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "discount rate must be in (0, 1), got {}",
                self.discount_rate
            )));
        }
        if self.depreciation_years == 0 {
            return Err(SimError::InvalidConfiguration(
                "depreciation period must be >= 1 year".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payback period and levelized cost of energy for one run.
#[derive(Debug, Clone, Copy)]
pub struct FinancialReport {
    /// Annual revenue (€).
    pub annual_revenue_eur: f64,
    /// Simple payback period (years); infinite when revenue does not
    /// exceed the O&M cost.
    pub payback_years: f64,
    /// Levelized cost of energy (€/MWh); infinite for zero production.
    pub lcoe_eur_mwh: f64,
}

impl FinancialReport {
    /// Computes the metrics for one simulated year of production.
    ///
    /// When `prices` is present, revenue follows the hourly day-ahead
    /// price; otherwise the fixed subsidy price applies to every MWh.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for invalid assumptions
    /// and [`SimError::MisalignedSeries`] when the price series does not
    /// match the production series.
    pub fn compute(
        production: &EnergySeries,
        prices: Option<&EnergySeries>,
        inputs: &FinancialInputs,
    ) -> Result<Self, SimError> {
        inputs.validate()?;

        let annual_revenue_eur = match prices {
            Some(prices) => {
                prices.check_aligned(production.len(), "day-ahead prices")?;
                production
                    .iter()
                    .zip(prices.iter())
                    .map(|(e, p)| e * p)
                    .sum()
            }
            None => production.sum() * inputs.subsidy_price_eur_mwh,
        };

        let net_annual = annual_revenue_eur - inputs.om_cost_eur;
        let payback_years = if net_annual > 0.0 {
            inputs.investment_eur / net_annual
        } else {
            f64::INFINITY
        };

        let production_mwh = production.sum();
        let lcoe_eur_mwh = if production_mwh > 0.0 {
            let rate = inputs.discount_rate;
            let crf = rate / (1.0 - (1.0 + rate).powi(-(inputs.depreciation_years as i32)));
            (crf * inputs.investment_eur + inputs.om_cost_eur) / production_mwh
        } else {
            f64::INFINITY
        };

        Ok(Self {
            annual_revenue_eur,
            payback_years,
            lcoe_eur_mwh,
        })
    }
}

impl fmt::Display for FinancialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Financial ---")?;
        writeln!(f, "Annual revenue:    {:.0} EUR", self.annual_revenue_eur)?;
        if self.payback_years.is_finite() {
            writeln!(f, "Payback period:    {:.1} years", self.payback_years)?;
        } else {
            writeln!(f, "Payback period:    never (revenue below O&M cost)")?;
        }
        writeln!(f, "LCOE:              {:.1} EUR/MWh", self.lcoe_eur_mwh)
    }
}
