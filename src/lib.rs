//! Energy-yield simulator for a hybrid wind/solar/battery plant.
//!
//! Feeds an hourly weather series through physical wind and PV production
//! models, balances the combined output against demand, and dispatches a
//! battery on the residuals. Reports capacity factors, storage
//! effectiveness, and financial metrics for the simulated year.

pub mod cli;
pub mod config;
pub mod error;
pub mod financial;
pub mod io;
/// Wind and solar production models.
pub mod models;
pub mod series;
/// Balance, battery dispatch, pipeline, and report modules.
pub mod sim;
pub mod weather;
