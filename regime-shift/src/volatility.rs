//! Rolling-volatility threshold detection
//!
//! Flags the steps at which the rolling standard deviation of log-returns
//! moves by more than a given percentile of all such moves.

use crate::error::{ConfigError, DetectError};
use crate::traits::Detector;
use crate::utils::{log_returns, percentile};
use ndarray::Array1;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Rolling-volatility threshold detector.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "VolatilityThresholdRaw"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolatilityThreshold {
    /// Rolling window length.
    window: usize,
    /// Percentile of volatility changes, in `(0, 100]`, above which a step is
    /// flagged.
    percentile: f64,
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct VolatilityThresholdRaw {
    window: usize,
    percentile: f64,
}

#[cfg(feature = "serde1")]
impl TryFrom<VolatilityThresholdRaw> for VolatilityThreshold {
    type Error = ConfigError;

    fn try_from(raw: VolatilityThresholdRaw) -> Result<Self, Self::Error> {
        Self::new(raw.window, raw.percentile)
    }
}

impl Default for VolatilityThreshold {
    fn default() -> Self {
        Self {
            window: 8,
            percentile: 85.0,
        }
    }
}

impl VolatilityThreshold {
    /// Create a new detector.
    ///
    /// # Errors
    /// `window` must be at least one and `percentile` must lie in `(0, 100]`.
    pub fn new(window: usize, percentile: f64) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::Parameter {
                name: "window",
                reason: "must be at least 1".into(),
            });
        }
        if !(percentile > 0.0 && percentile <= 100.0) {
            return Err(ConfigError::Parameter {
                name: "percentile",
                reason: format!("must lie in (0, 100], got {percentile}"),
            });
        }
        Ok(Self { window, percentile })
    }

    /// Rolling sample standard deviation of the log-returns of `series`.
    ///
    /// Entry `i` covers returns `i + 1 - window ..= i`. Entries without a
    /// full window, or whose deviation is undefined, are zero.
    ///
    /// # Errors
    /// Returns [`DetectError::NonPositive`] if a price is `<= 0`.
    pub fn rolling_volatility(&self, series: &[f64]) -> Result<Vec<f64>, DetectError> {
        let returns = Array1::from(log_returns(series)?);
        let mut vol = vec![0.0; returns.len()];
        if returns.len() >= self.window {
            returns
                .windows(self.window)
                .into_iter()
                .zip(vol.iter_mut().skip(self.window - 1))
                .for_each(|(w, v)| {
                    let sd = w.std(1.0);
                    *v = if sd.is_finite() { sd } else { 0.0 };
                });
        }
        Ok(vol)
    }
}

impl Detector for VolatilityThreshold {
    fn name(&self) -> &'static str {
        "rolling-volatility"
    }

    fn detect(&self, series: &[f64]) -> Result<Vec<usize>, DetectError> {
        let vol = self.rolling_volatility(series)?;
        let changes: Vec<f64> =
            vol.windows(2).map(|w| (w[1] - w[0]).abs()).collect();

        let Some(threshold) = percentile(&changes, self.percentile) else {
            return Ok(Vec::new());
        };

        Ok(changes
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > threshold)
            .map(|(i, _)| i + 1)
            .collect())
    }
}
