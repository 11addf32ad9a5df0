//! Peak/trough classification of change points.
//!
//! A change point is a peak when its value strictly dominates every value
//! within `window` steps on both sides, and a trough when it is strictly
//! dominated by all of them. Points too close to either end of the series
//! are never classified.

use crate::error::DetectError;
use derive_more::Display;
use tracing::debug;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Kind of local extremum.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Extremum {
    /// Strict local maximum.
    #[display(fmt = "peak")]
    Peak,
    /// Strict local minimum.
    #[display(fmt = "trough")]
    Trough,
}

/// Peaks and troughs among a set of change points, in input order.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified<L> {
    /// Change points classified as peaks.
    pub peaks: Vec<L>,
    /// Change points classified as troughs.
    pub troughs: Vec<L>,
}

impl<L> Default for Classified<L> {
    fn default() -> Self {
        Self {
            peaks: Vec::new(),
            troughs: Vec::new(),
        }
    }
}

/// Classify `series[idx]` against the `window` values on either side.
///
/// Returns `None` when `idx < window` or `idx >= series.len() - window`, or
/// when the value dominates neither way.
///
/// # Example
/// ```rust
/// use regime_shift::{classify_extrema, Extremum};
///
/// let series = [1.0, 2.0, 3.0, 10.0, 3.0, 2.0, 1.0, 0.0, 1.0, 2.0, 3.0];
/// assert_eq!(classify_extrema(&series, 3, 2), Some(Extremum::Peak));
/// assert_eq!(classify_extrema(&series, 7, 2), Some(Extremum::Trough));
/// assert_eq!(classify_extrema(&series, 1, 2), None);
/// ```
#[must_use]
pub fn classify_extrema(
    series: &[f64],
    idx: usize,
    window: usize,
) -> Option<Extremum> {
    if window == 0
        || idx < window
        || idx.saturating_add(window) >= series.len()
    {
        return None;
    }

    let value = series[idx];
    let neighbors = series[(idx - window)..idx]
        .iter()
        .chain(series[(idx + 1)..=(idx + window)].iter());

    let (lo, hi) = neighbors.fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &x| (lo.min(x), hi.max(x)),
    );

    if value > hi {
        Some(Extremum::Peak)
    } else if value < lo {
        Some(Extremum::Trough)
    } else {
        None
    }
}

/// Split `changepoints` into peak and trough indices.
///
/// Indices that are neither, including out-of-range ones, are dropped.
#[must_use]
pub fn classify_changepoints(
    series: &[f64],
    changepoints: &[usize],
    window: usize,
) -> Classified<usize> {
    changepoints
        .iter()
        .fold(Classified::default(), |mut acc, &idx| {
            match classify_extrema(series, idx, window) {
                Some(Extremum::Peak) => acc.peaks.push(idx),
                Some(Extremum::Trough) => acc.troughs.push(idx),
                None => (),
            }
            acc
        })
}

/// Like [`classify_changepoints`], but reports the external label of each
/// peak and trough instead of its index.
///
/// # Errors
/// Returns [`DetectError::LabelMismatch`] unless there is exactly one label
/// per observation.
pub fn classify_labeled<L: Clone>(
    series: &[f64],
    labels: &[L],
    changepoints: &[usize],
    window: usize,
) -> Result<Classified<L>, DetectError> {
    if labels.len() != series.len() {
        return Err(DetectError::LabelMismatch {
            labels: labels.len(),
            series: series.len(),
        });
    }

    let by_index = classify_changepoints(series, changepoints, window);
    for &idx in &by_index.peaks {
        debug!(idx, value = series[idx], kind = %Extremum::Peak, "extremum");
    }
    for &idx in &by_index.troughs {
        debug!(idx, value = series[idx], kind = %Extremum::Trough, "extremum");
    }

    Ok(Classified {
        peaks: by_index.peaks.iter().map(|&i| labels[i].clone()).collect(),
        troughs: by_index.troughs.iter().map(|&i| labels[i].clone()).collect(),
    })
}
