//! Crate-wide error types.

use thiserror::Error;

/// Errors surfaced by configuration validation and the simulation pipeline.
///
/// Configuration and alignment problems are detected eagerly, before any
/// series is computed; the pipeline never returns partial results. Numerical
/// edge cases (zero mean wind speed, zero DC power, wind speeds past the
/// power-curve domain) are defined inline policies in the models, not errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// A scenario parameter is outside its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Two series that must share the weather index have different lengths.
    #[error("misaligned series: `{name}` has {actual} samples, expected {expected}")]
    MisalignedSeries {
        /// Name of the offending series.
        name: &'static str,
        /// Length required by the weather index.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
}

/// Errors produced while loading weather, demand, price, or table files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Underlying file I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV structure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A field failed to parse or violated the format's unit conventions.
    #[error("parse error at record {record}: {message}")]
    Parse {
        /// One-based record number within the data section of the file.
        record: usize,
        /// What went wrong.
        message: String,
    },

    /// The file parsed but the resulting series violates a structural
    /// requirement (empty, gapped, or out-of-order timestamps).
    #[error("invalid series: {0}")]
    InvalidSeries(String),
}

impl LoadError {
    /// Shorthand for a parse failure at the given data record.
    pub fn parse(record: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            record,
            message: message.into(),
        }
    }
}
