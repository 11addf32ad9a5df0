//! This library detects regime changes in price series and classifies them as
//! peaks or troughs. It provides
//!  * Score-driven Bayesian online CPD as `SdBocpd`
//!  * Exact and bottom-up segmentation as `segmentation::Dynp` and
//!    `segmentation::BottomUp`
//!  * Rolling-volatility thresholding as `VolatilityThreshold`
//!  * A first-non-empty-wins ensemble of the above as `HybridDetector`
//!  * Peak/trough classification with `classify_changepoints`
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

#[cfg(test)]
pub mod generators;

pub mod error;
pub use error::{ConfigError, DetectError};

mod traits;
pub use self::traits::*;

mod hazard;
pub use hazard::HazardRate;

mod score_driven;
pub use score_driven::{ModelState, ScoreDrivenModel};

mod run_length;
pub use run_length::RunLengthPosterior;

mod sd_bocpd;
pub use sd_bocpd::{SdBocpd, SdBocpdOutput};

pub mod segmentation;

mod volatility;
pub use volatility::VolatilityThreshold;

mod ensemble;
pub use ensemble::{EnsembleOutcome, HybridDetector};

mod extrema;
pub use extrema::{
    classify_changepoints, classify_extrema, classify_labeled, Classified,
    Extremum,
};

mod pipeline;
pub use pipeline::{analyze, Analysis};

pub mod utils;
