//! Segment cost functions.

/// Quadratic (L2) segment cost: the sum of squared deviations from the
/// segment mean.
///
/// Cumulative sums are precomputed so that the cost of any `[start, end)`
/// segment is O(1).
#[derive(Clone, Debug, PartialEq)]
pub struct L2Cost {
    cum_sum: Vec<f64>,
    cum_sum_sq: Vec<f64>,
}

impl L2Cost {
    /// Precompute the cumulative sums of `series`.
    #[must_use]
    pub fn new(series: &[f64]) -> Self {
        let cum_sum: Vec<f64> = std::iter::once(0.0)
            .chain(series.iter().scan(0.0, |acc, &x| {
                *acc += x;
                Some(*acc)
            }))
            .collect();

        let cum_sum_sq: Vec<f64> = std::iter::once(0.0)
            .chain(series.iter().scan(0.0, |acc, &x| {
                *acc += x * x;
                Some(*acc)
            }))
            .collect();

        Self {
            cum_sum,
            cum_sum_sq,
        }
    }

    /// Number of observations covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cum_sum.len() - 1
    }

    /// Whether there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cost of the segment `[start, end)`.
    #[must_use]
    pub fn error(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        let n = (end - start) as f64;
        let sum = self.cum_sum[end] - self.cum_sum[start];
        let sum_sq = self.cum_sum_sq[end] - self.cum_sum_sq[start];
        // Rounding can push a flat segment slightly below zero
        (sum_sq - sum * sum / n).max(0.0)
    }
}
