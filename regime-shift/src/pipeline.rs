//! End-to-end detection and classification of a labeled series.

use crate::ensemble::{EnsembleOutcome, HybridDetector};
use crate::error::DetectError;
use crate::extrema::{classify_labeled, Classified};
use tracing::info;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Change points of a series and the labels of those that are peaks or
/// troughs.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis<L> {
    /// Output of the hybrid detector.
    pub outcome: EnsembleOutcome,
    /// Labels of classified change points.
    pub extrema: Classified<L>,
}

/// Detect change points in `series` with `detector` and classify them with
/// the given look-around `window`.
///
/// # Example
/// ```rust
/// use regime_shift::{analyze, HybridDetector};
///
/// let series = [5.0; 30];
/// let labels: Vec<usize> = (0..30).collect();
/// let analysis = analyze(&HybridDetector::default(), &series, &labels, 2).unwrap();
/// assert!(analysis.extrema.peaks.is_empty());
/// ```
///
/// # Errors
/// Returns [`DetectError::LabelMismatch`] unless there is exactly one label
/// per observation. Failures of individual detection strategies are not
/// errors.
pub fn analyze<L: Clone>(
    detector: &HybridDetector,
    series: &[f64],
    labels: &[L],
    window: usize,
) -> Result<Analysis<L>, DetectError> {
    if labels.len() != series.len() {
        return Err(DetectError::LabelMismatch {
            labels: labels.len(),
            series: series.len(),
        });
    }

    let outcome = detector.detect(series);
    let extrema = classify_labeled(series, labels, &outcome.changepoints, window)?;
    info!(
        changepoints = outcome.changepoints.len(),
        peaks = extrema.peaks.len(),
        troughs = extrema.troughs.len(),
        "analysis complete"
    );

    Ok(Analysis { outcome, extrema })
}
