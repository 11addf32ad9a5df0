//! Score-driven Bayesian online change point detection
//!
//! A [`ScoreDrivenModel`] tracks the dynamic variance of the series and turns
//! each observation into a Student-t predictive probability, which drives a
//! [`RunLengthPosterior`]. When the posterior declares a change point, both
//! are restarted from the current observation.

use crate::error::{ConfigError, DetectError};
use crate::hazard::HazardRate;
use crate::run_length::RunLengthPosterior;
use crate::score_driven::ScoreDrivenModel;
use crate::traits::Detector;
use crate::utils::{first_non_finite, population_variance};
use rv::prelude::{Rv, StudentsT};
use tracing::debug;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Number of leading observations used to seed the variance.
const WARMUP: usize = 10;

/// Score-driven BOCPD configuration.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "SdBocpdRaw"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SdBocpd {
    model: ScoreDrivenModel,
    hazard: HazardRate,
    threshold: f64,
    /// Run-length tail cutoff, off unless set with [`SdBocpd::with_cutoff`].
    cutoff: Option<f64>,
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct SdBocpdRaw {
    model: ScoreDrivenModel,
    hazard: HazardRate,
    threshold: f64,
    cutoff: Option<f64>,
}

#[cfg(feature = "serde1")]
impl TryFrom<SdBocpdRaw> for SdBocpd {
    type Error = ConfigError;

    fn try_from(raw: SdBocpdRaw) -> Result<Self, Self::Error> {
        let detector = Self::new(raw.model, raw.hazard, raw.threshold)?;
        Ok(match raw.cutoff {
            Some(cutoff) => detector.with_cutoff(cutoff),
            None => detector,
        })
    }
}

/// Output of a score-driven BOCPD run.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SdBocpdOutput {
    /// Indices at which a change point was declared.
    pub changepoints: Vec<usize>,
    /// Variance after each step; index 0 is left at zero.
    pub variances: Vec<f64>,
    /// Score of each observation; index 0 is left at zero.
    pub scores: Vec<f64>,
}

impl SdBocpd {
    /// Create a new detector.
    ///
    /// # Parameters
    /// * `model` - Score-driven variance model.
    /// * `hazard` - Prior probability of a change point at each step.
    /// * `threshold` - A change point is declared when the posterior mass at
    /// run length zero exceeds this.
    ///
    /// # Errors
    /// Returns [`ConfigError::Threshold`] if `threshold` is outside `(0, 1)`.
    pub fn new(
        model: ScoreDrivenModel,
        hazard: HazardRate,
        threshold: f64,
    ) -> Result<Self, ConfigError> {
        // Validate once here rather than on every reset
        RunLengthPosterior::new(hazard, threshold)?;
        Ok(Self {
            model,
            hazard,
            threshold,
            cutoff: None,
        })
    }

    /// Cap the run-length distribution of every run, dropping tail run
    /// lengths whose cumulative mass falls below `cutoff`.
    ///
    /// Without a cutoff the distribution grows by one entry per step between
    /// change points.
    #[must_use]
    pub fn with_cutoff(self, cutoff: f64) -> Self {
        Self {
            cutoff: Some(cutoff),
            ..self
        }
    }

    /// The run-length tail cutoff, if any.
    #[must_use]
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Conservative profile: heavier tails, faster variance response and a
    /// lower threshold. This is the profile the hybrid detector runs.
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            model: ScoreDrivenModel::new(4.0, 0.001, 0.06, 0.90)
                .expect("conservative parameters are valid"),
            hazard: HazardRate::new(1.0 / 25.0)
                .expect("conservative hazard is valid"),
            threshold: 0.3,
            cutoff: None,
        }
    }

    /// The variance model.
    #[must_use]
    pub fn model(&self) -> &ScoreDrivenModel {
        &self.model
    }

    fn posterior(&self) -> Result<RunLengthPosterior, ConfigError> {
        let posterior = RunLengthPosterior::new(self.hazard, self.threshold)?;
        Ok(match self.cutoff {
            Some(cutoff) => posterior.with_cutoff(cutoff),
            None => posterior,
        })
    }

    /// Run the detector over `series`.
    ///
    /// # Example
    /// ```rust
    /// use regime_shift::SdBocpd;
    ///
    /// let out = SdBocpd::default().run(&[1.0]).unwrap();
    /// assert!(out.changepoints.is_empty());
    /// assert!(out.variances.is_empty());
    /// assert!(out.scores.is_empty());
    /// ```
    ///
    /// # Errors
    /// Returns [`DetectError::NonFinite`] if the series contains NaN or
    /// infinite values.
    pub fn run(&self, series: &[f64]) -> Result<SdBocpdOutput, DetectError> {
        let n = series.len();
        if n < 2 {
            return Ok(SdBocpdOutput::default());
        }
        if let Some(index) = first_non_finite(series) {
            return Err(DetectError::NonFinite { index });
        }

        let t_dist = StudentsT::new_unchecked(self.model.nu());
        let mut posterior = self.posterior()?;

        let warmup = population_variance(&series[..n.min(WARMUP)]);
        let init_variance = if warmup > 0.0 && warmup.is_finite() {
            warmup
        } else {
            self.model.long_run_variance()
        };
        let mut state = self.model.init_state(series[0], init_variance);

        let mut out = SdBocpdOutput {
            changepoints: Vec::new(),
            variances: vec![0.0; n],
            scores: vec![0.0; n],
        };

        for (t, &x) in series.iter().enumerate().skip(1) {
            state = self.model.observe(state, x);
            out.scores[t] = state.score;
            out.variances[t] = state.variance;

            let z = (x - state.mu) / state.variance.sqrt();
            let pp = t_dist.ln_f(&z).exp();

            if posterior.update(pp) {
                debug!(
                    t,
                    p_cp = posterior.p_changepoint(),
                    run_length = posterior.map_run_length(),
                    "change point"
                );
                out.changepoints.push(t);
                state = self.model.reset(state, x);
                posterior.reset();
            } else {
                state = self.model.smooth_location(state, x);
            }
        }

        Ok(out)
    }
}

impl Default for SdBocpd {
    fn default() -> Self {
        Self {
            model: ScoreDrivenModel::default(),
            hazard: HazardRate::new(1.0 / 50.0).expect("default hazard is valid"),
            threshold: 0.5,
            cutoff: None,
        }
    }
}

impl Detector for SdBocpd {
    fn name(&self) -> &'static str {
        "sd-bocpd"
    }

    fn detect(&self, series: &[f64]) -> Result<Vec<usize>, DetectError> {
        self.run(series).map(|out| out.changepoints)
    }
}
