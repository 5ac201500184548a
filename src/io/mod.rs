//! File I/O: result export and demand/price imports.

pub mod export;
pub mod import;
