/// Residual energy balance between production and demand.
pub mod balance;
/// Sequential battery dispatch fold.
pub mod battery;
pub mod kpi;
pub mod pipeline;

pub use battery::{BatteryRatings, BatteryState};
pub use pipeline::SimulationResult;
