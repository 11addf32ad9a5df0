//! Exact segmentation by dynamic programming.
//!
//! Finds the `n_bkps` breakpoints minimizing the total L2 cost of the
//! resulting segments, subject to a minimum segment length.

use super::cost::L2Cost;
use crate::error::{ConfigError, DetectError};
use crate::traits::Detector;
use crate::utils::first_non_finite;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Optimal fixed-count segmentation.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "DynpRaw"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dynp {
    /// Number of breakpoints to place.
    n_bkps: usize,
    /// Minimum segment length.
    min_size: usize,
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct DynpRaw {
    n_bkps: usize,
    min_size: usize,
}

#[cfg(feature = "serde1")]
impl TryFrom<DynpRaw> for Dynp {
    type Error = ConfigError;

    fn try_from(raw: DynpRaw) -> Result<Self, Self::Error> {
        Self::new(raw.n_bkps, raw.min_size)
    }
}

impl Default for Dynp {
    fn default() -> Self {
        Self {
            n_bkps: 15,
            min_size: 8,
        }
    }
}

impl Dynp {
    /// Create a new segmenter.
    ///
    /// # Errors
    /// Both `n_bkps` and `min_size` must be at least one.
    pub fn new(n_bkps: usize, min_size: usize) -> Result<Self, ConfigError> {
        if n_bkps == 0 {
            return Err(ConfigError::Parameter {
                name: "n_bkps",
                reason: "must be at least 1".into(),
            });
        }
        if min_size == 0 {
            return Err(ConfigError::Parameter {
                name: "min_size",
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self { n_bkps, min_size })
    }

    /// Segment ends of the optimal segmentation. The last entry is always
    /// `series.len()`.
    ///
    /// # Example
    /// ```rust
    /// use regime_shift::segmentation::Dynp;
    ///
    /// let mut series = vec![0.0; 20];
    /// series.extend(vec![5.0; 20]);
    /// let bkps = Dynp::new(1, 4).unwrap().breakpoints(&series).unwrap();
    /// assert_eq!(bkps, vec![20, 40]);
    /// ```
    ///
    /// # Errors
    /// * [`DetectError::InsufficientData`] if `n_bkps + 1` segments of
    /// `min_size` do not fit in the series.
    /// * [`DetectError::NonFinite`] if the series contains NaN or infinite
    /// values.
    pub fn breakpoints(&self, series: &[f64]) -> Result<Vec<usize>, DetectError> {
        let n = series.len();
        let needed = (self.n_bkps + 1) * self.min_size;
        if needed > n {
            return Err(DetectError::InsufficientData { needed, got: n });
        }
        if let Some(index) = first_non_finite(series) {
            return Err(DetectError::NonFinite { index });
        }

        let cost = L2Cost::new(series);
        let m = self.min_size;

        // best[k][s]: minimum cost of splitting [s, n) into k + 1 segments.
        // next[k][s]: end of the first of those segments.
        let mut best = vec![vec![f64::INFINITY; n + 1]; self.n_bkps + 1];
        let mut next = vec![vec![n; n + 1]; self.n_bkps + 1];

        for s in 0..=(n - m) {
            best[0][s] = cost.error(s, n);
        }

        for k in 1..=self.n_bkps {
            // Leave room for k more segments after the first one
            let last_start = n - (k + 1) * m;
            for s in 0..=last_start {
                for b in (s + m)..=(n - k * m) {
                    let total = cost.error(s, b) + best[k - 1][b];
                    if total < best[k][s] {
                        best[k][s] = total;
                        next[k][s] = b;
                    }
                }
            }
        }

        let mut bkps = Vec::with_capacity(self.n_bkps + 1);
        let mut s = 0;
        for k in (1..=self.n_bkps).rev() {
            s = next[k][s];
            bkps.push(s);
        }
        bkps.push(n);
        Ok(bkps)
    }
}

impl Detector for Dynp {
    fn name(&self) -> &'static str {
        "dynp"
    }

    /// Breakpoints without the trailing `series.len()`, each moved back by
    /// one so it indexes the last observation of a segment.
    fn detect(&self, series: &[f64]) -> Result<Vec<usize>, DetectError> {
        let mut bkps = self.breakpoints(series)?;
        bkps.pop();
        Ok(bkps.into_iter().map(|b| b - 1).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(levels: &[f64], width: usize) -> Vec<f64> {
        levels
            .iter()
            .flat_map(|&level| std::iter::repeat(level).take(width))
            .collect()
    }

    #[test]
    fn recovers_level_shifts() {
        let series = steps(&[0.0, 4.0, -2.0, 6.0], 12);
        let dynp = Dynp::new(3, 4).unwrap();
        assert_eq!(dynp.breakpoints(&series).unwrap(), vec![12, 24, 36, 48]);
        assert_eq!(dynp.detect(&series).unwrap(), vec![11, 23, 35]);
    }

    #[test]
    fn respects_min_size() {
        // The spike only spans two points; with min_size 5 the breakpoints
        // must keep every segment at least five long
        let mut series = vec![0.0; 20];
        series[10] = 50.0;
        series[11] = 50.0;
        let bkps = Dynp::new(2, 5).unwrap().breakpoints(&series).unwrap();
        let mut start = 0;
        for &end in &bkps {
            assert!(end - start >= 5);
            start = end;
        }
        assert_eq!(*bkps.last().unwrap(), 20);
    }

    #[test]
    fn too_short_is_an_error() {
        let series = vec![1.0; 127];
        assert_eq!(
            Dynp::default().detect(&series),
            Err(DetectError::InsufficientData {
                needed: 128,
                got: 127
            })
        );
        assert_eq!(Dynp::default().detect(&vec![1.0; 128]).unwrap().len(), 15);
    }

    #[test]
    fn output_is_strictly_increasing() {
        let series: Vec<f64> = (0..200).map(|i| f64::from(i % 37)).collect();
        let cps = Dynp::default().detect(&series).unwrap();
        assert_eq!(cps.len(), 15);
        assert!(cps.windows(2).all(|w| w[0] < w[1]));
        assert!(cps.iter().all(|&cp| cp < series.len()));
    }

    #[test]
    fn zero_parameters_are_rejected() {
        assert!(Dynp::new(0, 8).is_err());
        assert!(Dynp::new(15, 0).is_err());
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn deserialized_config_is_validated() {
        assert!(serde_json::from_str::<Dynp>(r#"{"n_bkps":0,"min_size":8}"#).is_err());
        assert!(serde_json::from_str::<Dynp>(r#"{"n_bkps":15,"min_size":0}"#).is_err());
        let ok: Dynp = serde_json::from_str(r#"{"n_bkps":15,"min_size":8}"#).unwrap();
        assert_eq!(ok, Dynp::default());
    }
}
