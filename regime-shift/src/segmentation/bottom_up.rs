//! Bottom-up segmentation with a linear penalty.
//!
//! The series is first cut into a fine partition by repeatedly halving the
//! most expensive segment on a grid of admissible positions. Adjacent
//! segments are then merged greedily, cheapest merge first, for as long as
//! the cost of a merge stays below the penalty.

use super::cost::L2Cost;
use crate::error::{ConfigError, DetectError};
use crate::traits::Detector;
use crate::utils::{first_non_finite, log_returns};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Penalized bottom-up segmentation.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "BottomUpRaw"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BottomUp {
    /// Merges costing less than this are accepted.
    penalty: f64,
    /// Minimum segment length.
    min_size: usize,
    /// Breakpoints are restricted to multiples of this.
    jump: usize,
}

#[derive(Clone, Copy, Debug)]
struct Leaf {
    start: usize,
    end: usize,
    cost: f64,
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct BottomUpRaw {
    penalty: f64,
    min_size: usize,
    jump: usize,
}

#[cfg(feature = "serde1")]
impl TryFrom<BottomUpRaw> for BottomUp {
    type Error = ConfigError;

    fn try_from(raw: BottomUpRaw) -> Result<Self, Self::Error> {
        Self::new(raw.penalty, raw.min_size, raw.jump)
    }
}

impl Default for BottomUp {
    fn default() -> Self {
        Self {
            penalty: 0.5,
            min_size: 6,
            jump: 5,
        }
    }
}

impl BottomUp {
    /// Create a new segmenter.
    ///
    /// # Errors
    /// `penalty` must be finite and positive; `min_size` and `jump` must be
    /// at least one.
    pub fn new(
        penalty: f64,
        min_size: usize,
        jump: usize,
    ) -> Result<Self, ConfigError> {
        if !(penalty.is_finite() && penalty > 0.0) {
            return Err(ConfigError::Parameter {
                name: "penalty",
                reason: format!("must be finite and > 0, got {penalty}"),
            });
        }
        if min_size == 0 || jump == 0 {
            return Err(ConfigError::Parameter {
                name: if min_size == 0 { "min_size" } else { "jump" },
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self {
            penalty,
            min_size,
            jump,
        })
    }

    /// Segment ends of the penalized segmentation of `series`. The last entry
    /// is always `series.len()`.
    ///
    /// # Errors
    /// * [`DetectError::InsufficientData`] if the series is shorter than
    /// `min_size`.
    /// * [`DetectError::NonFinite`] if the series contains NaN or infinite
    /// values.
    pub fn breakpoints(&self, series: &[f64]) -> Result<Vec<usize>, DetectError> {
        let n = series.len();
        if n < self.min_size {
            return Err(DetectError::InsufficientData {
                needed: self.min_size,
                got: n,
            });
        }
        if let Some(index) = first_non_finite(series) {
            return Err(DetectError::NonFinite { index });
        }

        let cost = L2Cost::new(series);
        let mut leaves = self.grow(&cost);

        while leaves.len() > 1 {
            let (i, merged, gain) = leaves
                .windows(2)
                .enumerate()
                .map(|(i, pair)| {
                    let merged = cost.error(pair[0].start, pair[1].end);
                    (i, merged, merged - pair[0].cost - pair[1].cost)
                })
                .min_by(|a, b| a.2.total_cmp(&b.2))
                .expect("at least two leaves");

            if gain >= self.penalty {
                break;
            }
            let right = leaves.remove(i + 1);
            leaves[i].end = right.end;
            leaves[i].cost = merged;
        }

        Ok(leaves.into_iter().map(|leaf| leaf.end).collect())
    }

    /// Split the most expensive segment at the admissible position closest
    /// to its middle until that segment cannot be split.
    fn grow(&self, cost: &L2Cost) -> Vec<Leaf> {
        let n = cost.len();
        let mut partition = vec![(0, n)];

        loop {
            let mut idx = 0;
            for (i, &(s, e)) in partition.iter().enumerate().skip(1) {
                let (best_s, best_e) = partition[idx];
                if cost.error(s, e) > cost.error(best_s, best_e) {
                    idx = i;
                }
            }
            let (start, end) = partition[idx];

            let mid = (start + end) as f64 * 0.5;
            let split = (start..end)
                .filter(|b| b % self.jump == 0)
                .filter(|b| b - start >= self.min_size && end - b >= self.min_size)
                .min_by(|a, b| {
                    (*a as f64 - mid).abs().total_cmp(&(*b as f64 - mid).abs())
                });

            match split {
                Some(b) => {
                    partition.remove(idx);
                    partition.push((start, b));
                    partition.push((b, end));
                }
                None => break,
            }
        }

        partition.sort_unstable();
        partition
            .into_iter()
            .map(|(start, end)| Leaf {
                start,
                end,
                cost: cost.error(start, end),
            })
            .collect()
    }
}

/// [`BottomUp`] applied to the log-returns of a price series.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ReturnsBottomUp(pub BottomUp);

impl Detector for ReturnsBottomUp {
    fn name(&self) -> &'static str {
        "bottom-up-returns"
    }

    /// Breakpoints of the return series without the trailing sentinel.
    fn detect(&self, series: &[f64]) -> Result<Vec<usize>, DetectError> {
        let returns = log_returns(series)?;
        let mut bkps = self.0.breakpoints(&returns)?;
        bkps.pop();
        Ok(bkps)
    }
}
