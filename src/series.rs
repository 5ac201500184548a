//! Hourly energy series aligned to the weather timestamp index.

use crate::error::SimError;

/// An ordered sequence of hourly values (MW or MWh, one per weather
/// timestamp).
///
/// All series produced in one simulation run share the weather series'
/// index; they are aligned by position. Cross-series operations re-check
/// lengths via [`EnergySeries::check_aligned`] and fail fast on mismatch
/// rather than truncating or padding.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySeries(Vec<f64>);

impl EnergySeries {
    /// Wraps a value vector as a series.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// A series of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Number of hourly values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the series holds no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying values.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Iterator over the values.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Sum of all values. With the hourly grid, a sum over a power series
    /// in MW is numerically the energy total in MWh.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Arithmetic mean, or 0 for an empty series.
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.sum() / self.0.len() as f64
    }

    /// Smallest value, or 0 for an empty series.
    pub fn min(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value, or 0 for an empty series.
    pub fn max(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Sample standard deviation (n-1 denominator), or 0 when fewer than
    /// two values are present.
    pub fn std(&self) -> f64 {
        let n = self.0.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .0
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / (n - 1) as f64;
        var.sqrt()
    }

    /// Elementwise sum of two aligned series.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MisalignedSeries`] when the lengths differ.
    pub fn add(&self, other: &Self, other_name: &'static str) -> Result<Self, SimError> {
        other.check_aligned(self.len(), other_name)?;
        Ok(Self(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| a + b)
                .collect(),
        ))
    }

    /// Verifies this series has the expected length.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MisalignedSeries`] naming the series on mismatch.
    pub fn check_aligned(&self, expected: usize, name: &'static str) -> Result<(), SimError> {
        if self.len() != expected {
            return Err(SimError::MisalignedSeries {
                name,
                expected,
                actual: self.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<f64>> for EnergySeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<'a> IntoIterator for &'a EnergySeries {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_on_known_values() {
        let s = EnergySeries::new(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.len(), 4);
        assert_eq!(s.sum(), 10.0);
        assert_eq!(s.mean(), 2.5);
        assert_eq!(s.min(), 1.0);
        assert_eq!(s.max(), 4.0);
        // Sample std of 1..4 is sqrt(5/3)
        assert!((s.std() - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_series_stats_are_zero() {
        let s = EnergySeries::zeros(0);
        assert!(s.is_empty());
        assert_eq!(s.sum(), 0.0);
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.min(), 0.0);
        assert_eq!(s.max(), 0.0);
        assert_eq!(s.std(), 0.0);
    }

    #[test]
    fn add_requires_alignment() {
        let a = EnergySeries::new(vec![1.0, 2.0]);
        let b = EnergySeries::new(vec![3.0, 4.0]);
        let sum = a.add(&b, "b").unwrap();
        assert_eq!(sum.values(), &[4.0, 6.0]);

        let short = EnergySeries::new(vec![1.0]);
        let err = a.add(&short, "short").unwrap_err();
        assert!(matches!(
            err,
            crate::error::SimError::MisalignedSeries {
                name: "short",
                expected: 2,
                actual: 1,
            }
        ));
    }

    #[test]
    fn check_aligned_accepts_matching_length() {
        let s = EnergySeries::zeros(24);
        assert!(s.check_aligned(24, "s").is_ok());
        assert!(s.check_aligned(25, "s").is_err());
    }
}
