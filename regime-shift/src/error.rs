//! Error types for model configuration and detection strategies.

use thiserror::Error;

/// Invalid model or strategy parameters.
///
/// Returned by constructors, and by deserialization under `serde1`, so a
/// model that exists is guaranteed to keep its variance strictly positive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Student-t degrees of freedom must be finite and positive.
    #[error("degrees of freedom must be finite and > 0, got {0}")]
    DegreesOfFreedom(f64),
    /// Base variance must be finite and positive.
    #[error("base variance omega must be finite and > 0, got {0}")]
    Omega(f64),
    /// Score sensitivity must be finite and non-negative.
    #[error("score sensitivity alpha must be finite and >= 0, got {0}")]
    Alpha(f64),
    /// Persistence must lie in `[0, 1)`.
    #[error("persistence beta must lie in [0, 1), got {0}")]
    Beta(f64),
    /// Hazard rate must lie in `(0, 1)`.
    #[error("hazard rate must lie in (0, 1), got {0}")]
    HazardRate(f64),
    /// Posterior threshold must lie in `(0, 1)`.
    #[error("threshold must lie in (0, 1), got {0}")]
    Threshold(f64),
    /// Any other strategy parameter outside its domain.
    #[error("invalid value for `{name}`: {reason}")]
    Parameter {
        /// Parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

/// Failure of a single detection strategy.
///
/// Inside [`HybridDetector`](crate::HybridDetector) every variant is treated
/// as "no breakpoints found" and the next strategy runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// The strategy cannot run with this many observations.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData {
        /// Minimum number of observations
        needed: usize,
        /// Observations supplied
        got: usize,
    },
    /// An observation is NaN or infinite.
    #[error("non-finite observation at index {index}")]
    NonFinite {
        /// Offending position
        index: usize,
    },
    /// A log transform was applied to a value `<= 0`.
    #[error("non-positive observation at index {index} cannot be log-transformed")]
    NonPositive {
        /// Offending position
        index: usize,
    },
    /// External labels do not line up with the series.
    #[error("label count {labels} does not match series length {series}")]
    LabelMismatch {
        /// Number of labels
        labels: usize,
        /// Number of observations
        series: usize,
    },
    /// Invalid configuration discovered at detection time.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
