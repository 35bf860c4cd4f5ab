//! Data models for leafmatch
//!
//! Core data structures for fingerprints, match results, and matching
//! errors.

use thiserror::Error;

/// Errors produced by the matching core.
///
/// "Empty index" and "below threshold" are ordinary [`MatchResult`]
/// states, not errors.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The input bytes could not be parsed into a raster image
    /// (unsupported format, truncated data, zero-byte payload).
    #[error("could not decode image: {0}")]
    Decode(String),

    /// Two fingerprints were built with different binning parameters.
    /// This indicates an internal configuration bug, not a bad request.
    #[error("fingerprint length mismatch: query has {query} bins, reference has {reference}")]
    DimensionMismatch {
        /// Bin count of the query fingerprint
        query: usize,
        /// Bin count of the reference fingerprint
        reference: usize,
    },
}

/// Normalized joint color-histogram vector summarizing an image's color
/// distribution.
///
/// The histogram is taken jointly over (R, G, B) with `bins_per_channel`
/// bins per channel, flattened with the red axis outermost, and
/// L1-normalized so the entries sum to 1. This makes fingerprints of
/// different-sized images directly comparable.
///
/// Fingerprints are comparable only when built with the same
/// `bins_per_channel`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    /// Number of histogram bins per color channel
    pub bins_per_channel: usize,

    /// Flattened, normalized bin values (length = bins_per_channel cubed)
    pub values: Vec<f32>,
}

/// Outcome of matching one query fingerprint against the reference index.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Label of the best-scoring reference entry; `None` only when the
    /// index held no entries
    pub best_label: Option<String>,

    /// Best similarity score found, in [-1, 1]; `None` only when the
    /// index held no entries
    pub score: Option<f32>,

    /// True only when a best label exists and its score cleared the
    /// minimum-score threshold
    pub matched: bool,
}
