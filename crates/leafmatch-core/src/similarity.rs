//! Histogram similarity scoring
//!
//! Pearson correlation between two fingerprints, the standard
//! histogram-correlation metric.

use crate::models::{Fingerprint, MatchError};

/// Compute the Pearson correlation coefficient between two fingerprints.
///
/// The score lies in [-1, 1]: 1 for identical distribution shape, 0 for
/// uncorrelated, -1 for perfectly inverse. Fingerprints built with
/// different binning parameters fail with
/// [`MatchError::DimensionMismatch`].
///
/// A zero-variance histogram on either side (constant bin values,
/// including all-zero vectors) makes the metric undefined; it is pinned
/// to -1.0, the metric's lower bound, instead of propagating a division
/// by zero.
pub fn histogram_correlation(a: &Fingerprint, b: &Fingerprint) -> Result<f32, MatchError> {
    if a.bins_per_channel != b.bins_per_channel || a.values.len() != b.values.len() {
        return Err(MatchError::DimensionMismatch {
            query: a.values.len(),
            reference: b.values.len(),
        });
    }

    Ok(correlation(&a.values, &b.values))
}

/// Pearson correlation over two equal-length slices, with the
/// zero-variance case pinned to -1.0.
fn correlation(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len();
    if n == 0 {
        return -1.0;
    }

    let mean_a = a.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let mean_b = b.iter().map(|&v| v as f64).sum::<f64>() / n as f64;

    let mut covariance = 0.0f64;
    let mut variance_a = 0.0f64;
    let mut variance_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        covariance += dx * dy;
        variance_a += dx * dx;
        variance_b += dy * dy;
    }

    if variance_a <= 0.0 || variance_b <= 0.0 {
        return -1.0;
    }

    (covariance / (variance_a * variance_b).sqrt()).clamp(-1.0, 1.0) as f32
}
