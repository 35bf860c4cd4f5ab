//! Leafmatch Core Library
//!
//! Color-histogram fingerprinting and disease matching for crop leaf
//! photos. A directory of labeled reference images is fingerprinted once
//! into an in-memory index; query images are then matched against it by
//! histogram correlation.

pub mod config;
pub mod decoders;
pub mod fingerprint;
pub mod index;
pub mod models;
pub mod remedies;
pub mod similarity;

// Re-export commonly used items
pub use fingerprint::{
    extract_fingerprint, fingerprint_from_bytes, fingerprint_from_path, DEFAULT_BINS_PER_CHANNEL,
};
pub use index::{build_index, ReferenceEntry, ReferenceIndex, DEFAULT_MIN_SCORE};
pub use models::{Fingerprint, MatchError, MatchResult};
pub use similarity::histogram_correlation;
