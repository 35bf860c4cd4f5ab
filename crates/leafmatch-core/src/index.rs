//! Reference index construction and best-match selection
//!
//! The index is built once from a directory of labeled reference images
//! and is immutable afterward. Rebuilding constructs a fresh index and
//! swaps it in; a live index is never mutated, so it can be shared across
//! threads without locking.

use std::path::{Path, PathBuf};

use crate::fingerprint::fingerprint_from_path;
use crate::models::{Fingerprint, MatchError, MatchResult};
use crate::similarity::histogram_correlation;
use crate::verbose_println;

/// Image extensions recognized when scanning a reference directory
pub const REFERENCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];

/// Minimum correlation score required to accept a best-match candidate.
pub const DEFAULT_MIN_SCORE: f32 = 0.15;

/// A labeled reference fingerprint.
#[derive(Debug, Clone)]
pub struct ReferenceEntry {
    /// Disease label, derived from the reference filename
    pub label: String,

    /// Fingerprint of the reference image
    pub fingerprint: Fingerprint,
}

/// In-memory collection of labeled fingerprints built from known example
/// images.
///
/// Insertion order is preserved and acts as the tie-break order for equal
/// scores, so match results are reproducible.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    bins_per_channel: usize,
    entries: Vec<ReferenceEntry>,
}

impl ReferenceIndex {
    /// Create an empty index for the given binning scheme.
    pub fn new(bins_per_channel: usize) -> Self {
        Self {
            bins_per_channel,
            entries: Vec::new(),
        }
    }

    /// Binning scheme the index's fingerprints were built with.
    pub fn bins_per_channel(&self) -> usize {
        self.bins_per_channel
    }

    /// Number of reference entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion (tie-break) order.
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Look up an entry by label.
    pub fn get(&self, label: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// Insert a labeled fingerprint.
    ///
    /// A collision on the label replaces the fingerprint in place, keeping
    /// the original position so the tie-break order stays stable (last
    /// write wins on the value).
    pub fn insert(&mut self, label: String, fingerprint: Fingerprint) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.label == label) {
            entry.fingerprint = fingerprint;
        } else {
            self.entries.push(ReferenceEntry { label, fingerprint });
        }
    }

    /// Find the best-matching reference entry for a query fingerprint.
    ///
    /// Every entry is scored with [`histogram_correlation`]; the maximum
    /// wins and ties break to the earliest-inserted entry. The result is
    /// `matched` only when the best score reaches `min_score`. An empty
    /// index yields the defined no-match result rather than an error.
    pub fn best_match(
        &self,
        query: &Fingerprint,
        min_score: f32,
    ) -> Result<MatchResult, MatchError> {
        if self.entries.is_empty() {
            return Ok(MatchResult {
                best_label: None,
                score: None,
                matched: false,
            });
        }

        let mut best_score = f32::NEG_INFINITY;
        let mut best_label: Option<&str> = None;

        for entry in &self.entries {
            let score = histogram_correlation(query, &entry.fingerprint)?;

            // Strict comparison keeps the earliest-inserted entry on ties
            if best_label.is_none() || score > best_score {
                best_score = score;
                best_label = Some(&entry.label);
            }
        }

        Ok(MatchResult {
            best_label: best_label.map(|label| label.to_string()),
            score: Some(best_score),
            matched: best_score >= min_score,
        })
    }
}

/// Build a reference index from a directory of labeled images.
///
/// The label for each entry is the filename stem, lowercased. Candidate
/// files are sorted lexicographically before processing so builds are
/// reproducible regardless of directory enumeration order. Files that
/// fail to decode are skipped and logged; a missing or empty directory
/// yields an empty index rather than an error.
pub fn build_index<P: AsRef<Path>>(dir: P, bins_per_channel: usize) -> ReferenceIndex {
    let dir = dir.as_ref();
    let mut index = ReferenceIndex::new(bins_per_channel);

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            verbose_println!(
                "[leafmatch] Reference directory {} not readable: {}",
                dir.display(),
                e
            );
            return index;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| REFERENCE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .collect();

    // Sort for reproducible builds regardless of filesystem order
    files.sort();

    for path in files {
        let label = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_lowercase(),
            None => continue,
        };

        match fingerprint_from_path(&path, bins_per_channel) {
            Ok(fingerprint) => index.insert(label, fingerprint),
            Err(e) => {
                verbose_println!("[leafmatch] Skipping reference {}: {}", path.display(), e);
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint_from_bytes;

    /// A 512-bin fingerprint with all mass in one bin.
    fn one_hot(bin: usize) -> Fingerprint {
        let mut values = vec![0.0; 512];
        values[bin] = 1.0;
        Fingerprint {
            bins_per_channel: 8,
            values,
        }
    }

    /// Encode a solid-color PNG as a byte stream.
    fn solid_png(r: u8, g: u8, b: u8, width: u32, height: u32) -> Vec<u8> {
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            rgb.push(r);
            rgb.push(g);
            rgb.push(b);
        }

        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().expect("write PNG header");
            writer.write_image_data(&rgb).expect("write PNG data");
        }
        out
    }

    #[test]
    fn test_empty_index_yields_no_match() {
        let index = ReferenceIndex::new(8);
        let result = index.best_match(&one_hot(0), DEFAULT_MIN_SCORE).unwrap();

        assert!(!result.matched);
        assert_eq!(result.best_label, None);
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_identical_fingerprint_matches_its_label() {
        let mut index = ReferenceIndex::new(8);
        index.insert("rust_spot".to_string(), one_hot(10));
        index.insert("healthy".to_string(), one_hot(400));

        let result = index.best_match(&one_hot(10), DEFAULT_MIN_SCORE).unwrap();

        assert!(result.matched);
        assert_eq!(result.best_label.as_deref(), Some("rust_spot"));
        assert!((result.score.unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_below_threshold_reports_no_match_with_score() {
        let mut index = ReferenceIndex::new(8);
        index.insert("rust_spot".to_string(), one_hot(10));

        // A different one-hot vector scores -1/511, well below threshold
        let result = index.best_match(&one_hot(200), DEFAULT_MIN_SCORE).unwrap();

        assert!(!result.matched);
        assert_eq!(result.best_label.as_deref(), Some("rust_spot"));
        let score = result.score.unwrap();
        assert!(score < DEFAULT_MIN_SCORE, "score was {}", score);
    }

    #[test]
    fn test_constant_histogram_scores_lower_bound_everywhere() {
        let mut index = ReferenceIndex::new(8);
        index.insert("rust_spot".to_string(), one_hot(10));
        index.insert("healthy".to_string(), one_hot(400));

        // Zero-variance query: every color equally represented
        let flat = Fingerprint {
            bins_per_channel: 8,
            values: vec![1.0 / 512.0; 512],
        };

        let result = index.best_match(&flat, DEFAULT_MIN_SCORE).unwrap();
        assert!(!result.matched);
        assert_eq!(result.score, Some(-1.0));
    }

    #[test]
    fn test_uniform_coverage_image_never_matches() {
        use crate::decoders::DecodedImage;
        use crate::fingerprint::extract_fingerprint;

        // One pixel per histogram bin: the extracted fingerprint is
        // constant, so the correlation is pinned to -1 for any reference
        let mut data = Vec::with_capacity(512 * 3);
        for r in 0..8u16 {
            for g in 0..8u16 {
                for b in 0..8u16 {
                    data.push((r * 32) as u8);
                    data.push((g * 32) as u8);
                    data.push((b * 32) as u8);
                }
            }
        }
        let image = DecodedImage {
            width: 512,
            height: 1,
            data,
            channels: 3,
        };
        let query = extract_fingerprint(&image, 8);

        let mut index = ReferenceIndex::new(8);
        index.insert("rust_spot".to_string(), one_hot(10));
        index.insert("healthy".to_string(), one_hot(400));

        let result = index.best_match(&query, DEFAULT_MIN_SCORE).unwrap();
        assert_eq!(result.score, Some(-1.0));
        assert!(!result.matched);
    }

    #[test]
    fn test_ties_break_to_earliest_inserted() {
        let mut index = ReferenceIndex::new(8);
        index.insert("second_alphabetically".to_string(), one_hot(7));
        index.insert("first_alphabetically".to_string(), one_hot(7));

        let result = index.best_match(&one_hot(7), DEFAULT_MIN_SCORE).unwrap();
        assert_eq!(result.best_label.as_deref(), Some("second_alphabetically"));
    }

    #[test]
    fn test_label_collision_replaces_in_place() {
        let mut index = ReferenceIndex::new(8);
        index.insert("rust_spot".to_string(), one_hot(10));
        index.insert("healthy".to_string(), one_hot(400));
        index.insert("rust_spot".to_string(), one_hot(20));

        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].label, "rust_spot");
        assert_eq!(index.entries()[0].fingerprint, one_hot(20));
    }

    #[test]
    fn test_dimension_mismatch_propagates() {
        let mut index = ReferenceIndex::new(8);
        index.insert("rust_spot".to_string(), one_hot(10));

        let query = Fingerprint {
            bins_per_channel: 4,
            values: vec![1.0 / 64.0; 64],
        };

        let result = index.best_match(&query, DEFAULT_MIN_SCORE);
        assert!(matches!(result, Err(MatchError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_near_orthogonal_scenario() {
        // Two references with disjoint color mass; querying with one of
        // them returns its own label at a score close to 1
        let fp_rust = one_hot(100);
        let fp_healthy = one_hot(300);

        let mut index = ReferenceIndex::new(8);
        index.insert("rust_spot".to_string(), fp_rust.clone());
        index.insert("healthy".to_string(), fp_healthy);

        let result = index.best_match(&fp_rust, DEFAULT_MIN_SCORE).unwrap();
        assert!(result.matched);
        assert_eq!(result.best_label.as_deref(), Some("rust_spot"));
        assert!(result.score.unwrap() > 0.99);
    }

    #[test]
    fn test_build_index_from_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");

        std::fs::write(dir.path().join("Rust_Spot.png"), solid_png(200, 60, 20, 4, 4))
            .expect("write fixture");
        std::fs::write(dir.path().join("healthy.png"), solid_png(30, 180, 40, 4, 4))
            .expect("write fixture");
        // A corrupt file must be skipped without aborting the build
        std::fs::write(dir.path().join("broken.png"), b"not a png").expect("write fixture");
        // Unrelated files are ignored entirely
        std::fs::write(dir.path().join("notes.txt"), b"field notes").expect("write fixture");

        let index = build_index(dir.path(), 8);

        assert_eq!(index.len(), 2);
        assert!(index.get("rust_spot").is_some(), "labels are lowercased");
        assert!(index.get("healthy").is_some());
    }

    #[test]
    fn test_build_index_matches_reference_images() {
        let dir = tempfile::tempdir().expect("create temp dir");

        let rust_png = solid_png(200, 60, 20, 6, 6);
        std::fs::write(dir.path().join("rust_spot.png"), &rust_png).expect("write fixture");
        std::fs::write(dir.path().join("healthy.png"), solid_png(30, 180, 40, 6, 6))
            .expect("write fixture");

        let index = build_index(dir.path(), 8);
        let query = fingerprint_from_bytes(&rust_png, 8).expect("fingerprint query");

        let result = index.best_match(&query, DEFAULT_MIN_SCORE).unwrap();
        assert!(result.matched);
        assert_eq!(result.best_label.as_deref(), Some("rust_spot"));
        assert!(result.score.unwrap() > 0.99);
    }

    #[test]
    fn test_build_index_from_missing_directory() {
        let index = build_index("/nonexistent/leafmatch/references", 8);
        assert!(index.is_empty());

        // Matching against the empty index is still well-defined
        let result = index.best_match(&one_hot(0), DEFAULT_MIN_SCORE).unwrap();
        assert!(!result.matched);
        assert_eq!(result.best_label, None);
    }
}
