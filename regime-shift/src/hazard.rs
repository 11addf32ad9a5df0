//! Hazard rates.

use crate::error::ConfigError;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// A constant hazard rate.
/// This is the hazard that corresponds to a geometric distribution of run
/// lengths with timescale λ = 1/h.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "f64"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardRate(f64);

impl TryFrom<f64> for HazardRate {
    type Error = ConfigError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl HazardRate {
    /// Create a hazard rate, which must lie strictly between zero and one.
    ///
    /// # Errors
    /// Returns [`ConfigError::HazardRate`] if `rate` is outside `(0, 1)`.
    pub fn new(rate: f64) -> Result<Self, ConfigError> {
        if rate > 0.0 && rate < 1.0 {
            Ok(Self(rate))
        } else {
            Err(ConfigError::HazardRate(rate))
        }
    }

    /// Hazard rate for an expected run length of `lambda` steps.
    ///
    /// # Example
    /// ```rust
    /// use regime_shift::HazardRate;
    ///
    /// let h = HazardRate::from_timescale(50.0).unwrap();
    /// assert_eq!(h.rate(), 0.02);
    /// ```
    ///
    /// # Errors
    /// Returns [`ConfigError::HazardRate`] unless `lambda > 1`.
    pub fn from_timescale(lambda: f64) -> Result<Self, ConfigError> {
        Self::new(lambda.recip())
    }

    /// Prior probability of a change point at any step.
    #[must_use]
    pub fn rate(self) -> f64 {
        self.0
    }
}
