//! General Utilities

use crate::error::DetectError;
use crate::sd_bocpd::SdBocpdOutput;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, prelude::*};

/// Writes the data, variance and score traces, and change points to
/// `{prefix}_data.txt`, `{prefix}_traces.txt`, and
/// `{prefix}_change_points.txt`, respectively.
///
/// # Errors
/// If data cannot be written to disk, an error is returned.
pub fn write_data_and_traces<T: Display>(
    prefix: &str,
    data: &[T],
    output: &SdBocpdOutput,
) -> io::Result<()> {
    // Write Data
    let data_file_path = format!("{prefix}_data.txt");
    let mut data_f = File::create(data_file_path)?;
    data.iter().try_for_each(|d| writeln!(data_f, "{d}"))?;

    // Write traces as `variance,score` rows
    let traces_path = format!("{prefix}_traces.txt");
    let mut traces_f = File::create(traces_path)?;
    output
        .variances
        .iter()
        .zip(output.scores.iter())
        .enumerate()
        .try_for_each::<_, io::Result<()>>(|(i, (v, s))| {
            if !v.is_finite() || !s.is_finite() {
                tracing::warn!(row = i, "non-finite value in trace output");
            }
            writeln!(traces_f, "{v},{s}")
        })?;

    // Write change points
    let change_points_path = format!("{prefix}_change_points.txt");
    let mut cp_f = File::create(change_points_path)?;
    output
        .changepoints
        .iter()
        .try_for_each(|cp| writeln!(cp_f, "{cp}"))?;

    Ok(())
}

/// Population variance (divides by `n`). Empty input has zero variance.
#[must_use]
pub fn population_variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
}

/// First differences of the natural log, `ln(x[i+1]) - ln(x[i])`.
///
/// # Errors
/// Returns [`DetectError::NonPositive`] for the first value `<= 0` (or NaN),
/// since its log is undefined.
pub fn log_returns(series: &[f64]) -> Result<Vec<f64>, DetectError> {
    let logs = series
        .iter()
        .enumerate()
        .map(|(index, &x)| {
            if x > 0.0 {
                Ok(x.ln())
            } else {
                Err(DetectError::NonPositive { index })
            }
        })
        .collect::<Result<Vec<f64>, DetectError>>()?;

    Ok(logs.windows(2).map(|w| w[1] - w[0]).collect())
}

/// The `q`-th percentile using linear interpolation between closest ranks.
/// `q` is clamped to `[0, 100]`. Returns `None` for empty input.
#[must_use]
pub fn percentile(xs: &[f64], q: f64) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Index of the first occurrence of a non-finite value, if any.
pub(crate) fn first_non_finite(xs: &[f64]) -> Option<usize> {
    xs.iter().position(|x| !x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_of_known_values() {
        assert::close(population_variance(&[1.0, 2.0, 3.0, 4.0]), 1.25, 1E-12);
        assert::close(population_variance(&[7.0; 5]), 0.0, 1E-12);
        assert::close(population_variance(&[]), 0.0, 1E-12);
    }

    #[test]
    fn log_returns_of_doubling() {
        let r = log_returns(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(r.len(), 2);
        assert::close(r[0], std::f64::consts::LN_2, 1E-12);
        assert::close(r[1], std::f64::consts::LN_2, 1E-12);
    }

    #[test]
    fn log_returns_reject_non_positive() {
        assert_eq!(
            log_returns(&[1.0, 0.0, 2.0]),
            Err(DetectError::NonPositive { index: 1 })
        );
    }

    #[test]
    fn percentile_interpolates() {
        let xs = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&xs, 0.0), Some(1.0));
        assert_eq!(percentile(&xs, 50.0), Some(3.0));
        assert_eq!(percentile(&xs, 100.0), Some(5.0));
        // rank = 0.85 * 4 = 3.4
        assert::close(percentile(&xs, 85.0).unwrap(), 4.4, 1E-12);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn percentile_clamps_out_of_range_q() {
        let xs = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&xs, -10.0), Some(1.0));
        assert_eq!(percentile(&xs, 150.0), Some(5.0));
    }
}
