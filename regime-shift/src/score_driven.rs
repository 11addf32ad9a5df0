//! Score-driven (GAS) variance model with Student-t innovations.
//!
//! The variance follows
//! \[
//!     \sigma^2_{t+1} = \omega + \alpha s_t^2 + \beta \sigma^2_t
//! \]
//! where $s_t$ is the Student-t location score rescaled to the units of the
//! observation.

use crate::error::ConfigError;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Smoothing weight kept on the previous location estimate.
const LOCATION_PERSISTENCE: f64 = 0.95;

/// Parameters of the score-driven variance recursion.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "ScoreDrivenModelRaw"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreDrivenModel {
    /// Student-t degrees of freedom.
    nu: f64,
    /// Base variance.
    omega: f64,
    /// Score sensitivity.
    alpha: f64,
    /// Persistence.
    beta: f64,
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct ScoreDrivenModelRaw {
    nu: f64,
    omega: f64,
    alpha: f64,
    beta: f64,
}

#[cfg(feature = "serde1")]
impl TryFrom<ScoreDrivenModelRaw> for ScoreDrivenModel {
    type Error = ConfigError;

    fn try_from(raw: ScoreDrivenModelRaw) -> Result<Self, Self::Error> {
        Self::new(raw.nu, raw.omega, raw.alpha, raw.beta)
    }
}

/// Transient state of one detection run.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelState {
    /// Location estimate.
    pub mu: f64,
    /// Dynamic variance.
    pub variance: f64,
    /// Score of the most recent observation.
    pub score: f64,
}

impl ScoreDrivenModel {
    /// Create a new model.
    ///
    /// # Parameters
    /// * `nu` - Student-t degrees of freedom, `> 0`.
    /// * `omega` - Base variance, `> 0`.
    /// * `alpha` - Score sensitivity, `>= 0`.
    /// * `beta` - Persistence, in `[0, 1)`.
    ///
    /// # Errors
    /// Any parameter outside its domain is reported as a [`ConfigError`];
    /// these are exactly the conditions that keep the variance positive.
    pub fn new(
        nu: f64,
        omega: f64,
        alpha: f64,
        beta: f64,
    ) -> Result<Self, ConfigError> {
        if !(nu.is_finite() && nu > 0.0) {
            return Err(ConfigError::DegreesOfFreedom(nu));
        }
        if !(omega.is_finite() && omega > 0.0) {
            return Err(ConfigError::Omega(omega));
        }
        if !(alpha.is_finite() && alpha >= 0.0) {
            return Err(ConfigError::Alpha(alpha));
        }
        if !(0.0..1.0).contains(&beta) {
            return Err(ConfigError::Beta(beta));
        }
        Ok(Self {
            nu,
            omega,
            alpha,
            beta,
        })
    }

    /// Degrees of freedom.
    #[must_use]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Unconditional variance, ω / (1 − β).
    #[must_use]
    pub fn long_run_variance(&self) -> f64 {
        self.omega / (1.0 - self.beta)
    }

    /// Student-t location score of `x`, expressed in the units of `x`.
    #[must_use]
    pub fn score(&self, x: f64, mu: f64, variance: f64) -> f64 {
        let sd = variance.sqrt();
        let z = (x - mu) / sd;
        (self.nu + 1.0) * z / (self.nu + z * z) * sd
    }

    /// Next variance given the current variance and score.
    #[must_use]
    pub fn update_variance(&self, variance: f64, score: f64) -> f64 {
        self.omega + self.alpha * score * score + self.beta * variance
    }

    /// Start a run at `x` with the given variance.
    #[must_use]
    pub fn init_state(&self, x: f64, variance: f64) -> ModelState {
        ModelState {
            mu: x,
            variance,
            score: 0.0,
        }
    }

    /// Consume `x`: compute its score and advance the variance.
    ///
    /// The location is left untouched; it moves either through
    /// [`smooth_location`](Self::smooth_location) or a
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn observe(&self, state: ModelState, x: f64) -> ModelState {
        let score = self.score(x, state.mu, state.variance);
        ModelState {
            mu: state.mu,
            variance: self.update_variance(state.variance, score),
            score,
        }
    }

    /// Exponentially smooth the location towards `x`.
    #[must_use]
    pub fn smooth_location(&self, state: ModelState, x: f64) -> ModelState {
        ModelState {
            mu: LOCATION_PERSISTENCE * state.mu
                + (1.0 - LOCATION_PERSISTENCE) * x,
            ..state
        }
    }

    /// State after a change point at `x`.
    #[must_use]
    pub fn reset(&self, state: ModelState, x: f64) -> ModelState {
        ModelState {
            mu: x,
            variance: self.long_run_variance(),
            ..state
        }
    }
}

impl Default for ScoreDrivenModel {
    fn default() -> Self {
        Self {
            nu: 5.0,
            omega: 0.01,
            alpha: 0.05,
            beta: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(
            ScoreDrivenModel::new(0.0, 0.01, 0.05, 0.9),
            Err(ConfigError::DegreesOfFreedom(0.0))
        );
        assert_eq!(
            ScoreDrivenModel::new(5.0, 0.0, 0.05, 0.9),
            Err(ConfigError::Omega(0.0))
        );
        assert_eq!(
            ScoreDrivenModel::new(5.0, 0.01, -0.1, 0.9),
            Err(ConfigError::Alpha(-0.1))
        );
        assert_eq!(
            ScoreDrivenModel::new(5.0, 0.01, 0.05, 1.0),
            Err(ConfigError::Beta(1.0))
        );
        assert!(ScoreDrivenModel::new(5.0, 0.01, 0.05, 0.0).is_ok());
    }

    #[test]
    fn score_matches_closed_form() {
        let model = ScoreDrivenModel::default();
        // z = 0.5 / 0.5 = 1 => (6 * 1) / (5 + 1) * 0.5 = 0.5
        assert::close(model.score(10.0, 9.5, 0.25), 0.5, 1E-12);
        assert::close(model.score(9.5, 9.5, 0.25), 0.0, 1E-12);
        // odd in the residual
        assert::close(
            model.score(9.0, 9.5, 0.25),
            -model.score(10.0, 9.5, 0.25),
            1E-12,
        );
    }

    #[test]
    fn variance_recursion() {
        let model = ScoreDrivenModel::default();
        let next = model.update_variance(0.1, 0.05);
        assert::close(next, 0.01 + 0.05 * 0.0025 + 0.9 * 0.1, 1E-12);
        assert!(next > 0.0);
        assert!(model.update_variance(0.0, 0.0) > 0.0);
    }

    #[test]
    fn reset_restores_long_run_variance() {
        let model = ScoreDrivenModel::default();
        let state = model.observe(model.init_state(1.0, 4.0), 3.0);
        let reset = model.reset(state, 3.0);
        assert::close(reset.mu, 3.0, 1E-12);
        assert::close(reset.variance, 0.1, 1E-12);
    }

    #[test]
    fn smoothing_moves_five_percent() {
        let model = ScoreDrivenModel::default();
        let state = model.smooth_location(model.init_state(0.0, 1.0), 1.0);
        assert::close(state.mu, 0.05, 1E-12);
        assert::close(state.variance, 1.0, 1E-12);
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn deserialized_model_is_validated() {
        let unit_beta = r#"{"nu":5.0,"omega":0.01,"alpha":0.05,"beta":1.0}"#;
        assert!(serde_json::from_str::<ScoreDrivenModel>(unit_beta).is_err());
        let zero_omega = r#"{"nu":5.0,"omega":0.0,"alpha":0.05,"beta":0.9}"#;
        assert!(serde_json::from_str::<ScoreDrivenModel>(zero_omega).is_err());

        let model = ScoreDrivenModel::default();
        let json = serde_json::to_string(&model).unwrap();
        let back: ScoreDrivenModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
