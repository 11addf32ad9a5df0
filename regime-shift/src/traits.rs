use crate::error::DetectError;

/// Trait for change point detection strategies run by the
/// [`HybridDetector`](crate::HybridDetector).
pub trait Detector {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
    /// Detect change points in `series`.
    ///
    /// The returned indices refer to positions in `series` and are strictly
    /// increasing.
    ///
    /// # Errors
    /// A strategy that cannot produce an answer for this input reports why
    /// instead of returning a partial result.
    fn detect(&self, series: &[f64]) -> Result<Vec<usize>, DetectError>;
}
