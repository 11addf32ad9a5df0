//! Online Bayesian run-length posterior
//!
//! The recursion is the growth/change-point split of
//! "Bayesian Online Changepoint Detection"; Ryan Adams, David `MacKay`; arXiv:0710.3742
//! Which can be found [here](https://arxiv.org/pdf/0710.3742.pdf).
//!
//! Unlike the paper, the observation likelihood is a single predictive
//! probability applied to every run length alike. Downstream change points
//! depend on this, so it is kept as is.

use crate::error::ConfigError;
use crate::hazard::HazardRate;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Run-length posterior state container.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "RunLengthPosteriorRaw"))]
#[derive(Clone, Debug, PartialEq)]
pub struct RunLengthPosterior {
    /// Prior probability of a change point at each step.
    hazard: HazardRate,
    /// A change point is declared when `r[0]` exceeds this.
    threshold: f64,
    /// Run-length probabilities.
    r: Vec<f64>,
    /// Tail mass below this is dropped after each step, if set.
    cutoff: Option<f64>,
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct RunLengthPosteriorRaw {
    hazard: HazardRate,
    threshold: f64,
    r: Vec<f64>,
    cutoff: Option<f64>,
}

#[cfg(feature = "serde1")]
impl TryFrom<RunLengthPosteriorRaw> for RunLengthPosterior {
    type Error = ConfigError;

    fn try_from(raw: RunLengthPosteriorRaw) -> Result<Self, Self::Error> {
        let mut posterior = Self::new(raw.hazard, raw.threshold)?;
        if raw.r.is_empty() || raw.r.iter().any(|p| !(p.is_finite() && *p >= 0.0)) {
            return Err(ConfigError::Parameter {
                name: "r",
                reason: "must be a non-empty vector of finite, non-negative masses"
                    .into(),
            });
        }
        posterior.r = raw.r;
        posterior.cutoff = raw.cutoff;
        Ok(posterior)
    }
}

impl RunLengthPosterior {
    /// Create a new posterior starting at run length zero.
    ///
    /// # Example
    /// ```rust
    /// use regime_shift::{HazardRate, RunLengthPosterior};
    ///
    /// let mut posterior =
    ///     RunLengthPosterior::new(HazardRate::new(0.02).unwrap(), 0.5).unwrap();
    /// assert!(!posterior.update(0.3));
    /// assert_eq!(posterior.run_lengths().len(), 2);
    /// ```
    ///
    /// # Errors
    /// Returns [`ConfigError::Threshold`] if `threshold` is outside `(0, 1)`.
    pub fn new(hazard: HazardRate, threshold: f64) -> Result<Self, ConfigError> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ConfigError::Threshold(threshold));
        }
        Ok(Self {
            hazard,
            threshold,
            r: vec![1.0],
            cutoff: None,
        })
    }

    /// Drop tail run lengths whose cumulative mass falls below `cutoff`.
    ///
    /// Without a cutoff the distribution grows by one entry every step until
    /// the next change point.
    #[must_use]
    pub fn with_cutoff(self, cutoff: f64) -> Self {
        Self {
            cutoff: Some(cutoff),
            ..self
        }
    }

    /// Reset to a single run of length zero.
    pub fn reset(&mut self) {
        self.r.clear();
        self.r.push(1.0);
    }

    /// Run-length probabilities, indexed by run length.
    #[must_use]
    pub fn run_lengths(&self) -> &[f64] {
        &self.r
    }

    /// Probability that a change point just occurred.
    #[must_use]
    pub fn p_changepoint(&self) -> f64 {
        self.r[0]
    }

    /// Most probable run length.
    #[must_use]
    pub fn map_run_length(&self) -> usize {
        self.r
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, best_p), (i, &p)| {
                if p > best_p {
                    (i, p)
                } else {
                    (best, best_p)
                }
            })
            .0
    }

    /// Update with the predictive probability of the current observation and
    /// return whether a change point should be declared.
    pub fn update(&mut self, pp: f64) -> bool {
        let h = self.hazard.rate();
        let cp_mass: f64 = self.r.iter().sum::<f64>() * h;

        // Shift growth probabilities up one run length and put the change
        // point mass at r[0]
        self.r.push(0.0);
        for i in (0..(self.r.len() - 1)).rev() {
            self.r[i + 1] = self.r[i] * (1.0 - h) * pp;
        }
        self.r[0] = cp_mass * pp;

        self.normalize();

        if let Some(cutoff) = self.cutoff {
            self.truncate(cutoff);
        }

        debug_assert!(
            !self.r.iter().any(|x| x.is_nan()),
            "Resulting run-length probabilities cannot contain NaNs"
        );

        self.r[0] > self.threshold
    }

    fn normalize(&mut self) {
        let r_sum: f64 = self.r.iter().sum();
        if r_sum > 0.0 && r_sum.is_finite() {
            self.r.iter_mut().for_each(|p| *p /= r_sum);
        } else {
            let uniform = (self.r.len() as f64).recip();
            self.r.iter_mut().for_each(|p| *p = uniform);
        }
    }

    fn truncate(&mut self, cutoff: f64) {
        let keep = self
            .r
            .iter()
            .rev()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .position(|tail| tail > cutoff)
            .map(|from_end| self.r.len() - from_end);

        if let Some(keep) = keep {
            if keep < self.r.len() {
                self.r.truncate(keep);
                let r_sum: f64 = self.r.iter().sum();
                self.r.iter_mut().for_each(|p| *p /= r_sum);
            }
        }
    }
}
