//! Input expansion and shared matching helpers.

use std::path::{Path, PathBuf};

use serde::Serialize;

use leafmatch_core::config;
use leafmatch_core::remedies::{self, RemedyBook};
use leafmatch_core::{fingerprint_from_path, ReferenceIndex};

/// Supported image extensions for inputs and reference scans
pub use leafmatch_core::index::REFERENCE_EXTENSIONS as SUPPORTED_EXTENSIONS;

/// Expand a list of inputs (files and directories) into a list of image files.
///
/// Directories are scanned for supported image files (.jpg, .jpeg, .png,
/// .tif, .tiff). If `recursive` is true, subdirectories are also scanned.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_images_from_dir(input, recursive, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(format!("Path not found: {}", input.display()));
        }
    }

    // Sort for consistent ordering
    files.sort();
    Ok(files)
}

/// Recursively collect image files from a directory.
fn collect_images_from_dir(
    dir: &Path,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Error reading directory entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() && recursive {
            collect_images_from_dir(&path, recursive, files)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }
    Ok(())
}

/// Matcher settings resolved from CLI flags and the loaded config file.
#[derive(Debug, Clone)]
pub struct MatcherSettings {
    /// Directory of labeled reference images
    pub reference_dir: PathBuf,

    /// Histogram bins per color channel
    pub bins_per_channel: usize,

    /// Minimum similarity score required to report a match
    pub min_score: f32,

    /// Remedy catalog file; `None` means the builtin catalog
    pub remedies_path: Option<PathBuf>,
}

/// Resolve matcher settings, with CLI flags taking precedence over the
/// config file, which takes precedence over built-in defaults.
pub fn resolve_settings(
    references: Option<PathBuf>,
    bins: Option<usize>,
    min_score: Option<f32>,
    remedies_file: Option<PathBuf>,
) -> Result<MatcherSettings, String> {
    let handle = config::matcher_config_handle();
    let defaults = &handle.config.defaults;

    let reference_dir = references
        .or_else(|| handle.config.reference_dir.clone())
        .or_else(config::default_reference_dir)
        .ok_or_else(|| {
            "No reference directory specified (use --references or set reference_dir in leafmatch.yml)"
                .to_string()
        })?;

    // An explicit file is honored even if missing (so the error surfaces);
    // the user-level default only applies once it exists
    let remedies_path = remedies_file
        .or_else(|| handle.config.remedies.clone())
        .or_else(|| config::default_remedies_path().filter(|path| path.exists()));

    Ok(MatcherSettings {
        reference_dir,
        bins_per_channel: bins.unwrap_or(defaults.bins_per_channel),
        min_score: min_score.unwrap_or(defaults.min_score),
        remedies_path,
    })
}

/// Load the remedy catalog named by the settings, or the builtin catalog.
pub fn load_remedies(settings: &MatcherSettings) -> Result<RemedyBook, String> {
    match &settings.remedies_path {
        Some(path) => remedies::load_remedy_book(path),
        None => Ok(RemedyBook::builtin()),
    }
}

/// Per-file match report, printable and JSON-serializable.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Input image path
    pub input: PathBuf,

    /// Whether the best score cleared the threshold
    pub matched: bool,

    /// Matched disease label (only set when `matched`)
    pub disease: Option<String>,

    /// Remedy recorded for the matched disease, if any
    pub remedy: Option<String>,

    /// Best similarity score found; absent when the index was empty
    pub score: Option<f32>,
}

/// Match a single image file against the index and look up its remedy.
pub fn match_single_image(
    input: &Path,
    index: &ReferenceIndex,
    remedies: &RemedyBook,
    min_score: f32,
) -> Result<MatchReport, String> {
    let query =
        fingerprint_from_path(input, index.bins_per_channel()).map_err(|e| e.to_string())?;

    let result = index
        .best_match(&query, min_score)
        .map_err(|e| e.to_string())?;

    let disease = if result.matched {
        result.best_label
    } else {
        None
    };
    let remedy = disease
        .as_deref()
        .and_then(|label| remedies.lookup(label))
        .map(|r| r.to_string());

    Ok(MatchReport {
        input: input.to_path_buf(),
        matched: result.matched,
        disease,
        remedy,
        score: result.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        let rgb = vec![120u8; (width * height * 3) as usize];
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().expect("write PNG header");
            writer.write_image_data(&rgb).expect("write PNG data");
        }
        std::fs::write(path, out).expect("write fixture");
    }

    #[test]
    fn test_expand_inputs_scans_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_png(&dir.path().join("a.png"), 2, 2);
        write_png(&dir.path().join("b.png"), 2, 2);
        std::fs::write(dir.path().join("notes.txt"), b"skip me").expect("write fixture");

        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).expect("create nested dir");
        write_png(&nested.join("c.png"), 2, 2);

        let flat = expand_inputs(&[dir.path().to_path_buf()], false).expect("expand flat");
        assert_eq!(flat.len(), 2);

        let recursive = expand_inputs(&[dir.path().to_path_buf()], true).expect("expand recursive");
        assert_eq!(recursive.len(), 3);
    }

    #[test]
    fn test_expand_inputs_missing_path_fails() {
        let result = expand_inputs(&[PathBuf::from("/nonexistent/leaf.png")], false);
        assert!(result.is_err());
    }
}
