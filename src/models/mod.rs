//! Physical production models for the plant's generation assets.

pub mod solar;
pub mod wind;

pub use solar::{Location, SandiaModuleParams, SolarPlant};
pub use wind::{PowerCurveTable, WindPlant};
