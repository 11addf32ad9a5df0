//! Hybrid change point detection
//!
//! Several independent strategies are tried in a fixed priority order and
//! the first one that produces at least one change point wins. A failing
//! strategy counts as having found nothing.

use crate::sd_bocpd::SdBocpd;
use crate::segmentation::{Dynp, ReturnsBottomUp};
use crate::traits::Detector;
use crate::volatility::VolatilityThreshold;
use tracing::info;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Change points chosen by a [`HybridDetector`].
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EnsembleOutcome {
    /// Name of the strategy that produced `changepoints`, or `None` if every
    /// strategy came up empty.
    pub strategy: Option<String>,
    /// Strictly increasing change point indices.
    pub changepoints: Vec<usize>,
}

/// Ordered chain of detection strategies.
pub struct HybridDetector {
    strategies: Vec<Box<dyn Detector>>,
}

impl Default for HybridDetector {
    /// Optimal segmentation, then bottom-up segmentation of log-returns,
    /// then conservative score-driven BOCPD, then rolling-volatility
    /// thresholding.
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(Dynp::default()),
            Box::new(ReturnsBottomUp::default()),
            Box::new(SdBocpd::conservative()),
            Box::new(VolatilityThreshold::default()),
        ])
    }
}

impl std::fmt::Debug for HybridDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

impl HybridDetector {
    /// Create a detector running `strategies` in the given order.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn Detector>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies, in priority order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }

    /// Run the strategies in order until one finds a change point.
    ///
    /// Strategies after the winning one are never run.
    ///
    /// # Example
    /// ```rust
    /// use regime_shift::HybridDetector;
    ///
    /// let outcome = HybridDetector::default().detect(&[10.0; 50]);
    /// assert!(outcome.changepoints.is_empty());
    /// assert_eq!(outcome.strategy, None);
    /// ```
    #[must_use]
    pub fn detect(&self, series: &[f64]) -> EnsembleOutcome {
        for strategy in &self.strategies {
            match strategy.detect(series) {
                Ok(changepoints) if !changepoints.is_empty() => {
                    info!(
                        strategy = strategy.name(),
                        n = changepoints.len(),
                        "adopting change points"
                    );
                    return EnsembleOutcome {
                        strategy: Some(strategy.name().to_string()),
                        changepoints,
                    };
                }
                Ok(_) => {
                    info!(strategy = strategy.name(), "no change points");
                }
                Err(err) => {
                    info!(strategy = strategy.name(), %err, "strategy failed");
                }
            }
        }
        EnsembleOutcome::default()
    }
}
