//! Matcher configuration management.
//!
//! This module provides configuration loading, global verbose flag
//! management, and the matcher parameter defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::Deserialize;

use crate::fingerprint::DEFAULT_BINS_PER_CHANNEL;
use crate::index::DEFAULT_MIN_SCORE;

// Global verbose flag for controlling diagnostic output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, diagnostic messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["leafmatch.yml", "leafmatch.yaml"];

/// Matcher parameter defaults and their validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatcherDefaults {
    /// Histogram bins per color channel (bins cubed total bins)
    pub bins_per_channel: usize,

    /// Minimum correlation score required to accept a best match
    pub min_score: f32,
}

impl Default for MatcherDefaults {
    fn default() -> Self {
        Self {
            bins_per_channel: DEFAULT_BINS_PER_CHANNEL,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl MatcherDefaults {
    /// Clamp out-of-range values back to usable ones.
    pub fn sanitize(&mut self) {
        self.bins_per_channel = self.bins_per_channel.clamp(2, 16);
        self.min_score = self.min_score.clamp(-1.0, 1.0);
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MatcherConfig {
    pub defaults: MatcherDefaults,

    /// Directory of labeled reference images
    pub reference_dir: Option<PathBuf>,

    /// Remedy catalog file; the builtin catalog is used when unset
    pub remedies: Option<PathBuf>,
}

impl MatcherConfig {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self
    }
}

/// Public handle that stores the loaded configuration, its source path, and warnings.
pub struct MatcherConfigHandle {
    pub config: MatcherConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl MatcherConfigHandle {
    fn with_config(config: MatcherConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Load configuration from disk, optionally forcing a specific path.
pub fn load_matcher_config(custom_path: Option<&Path>) -> MatcherConfigHandle {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<MatcherConfig>(&contents) {
                Ok(config) => {
                    let sanitized = config.sanitize();
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return MatcherConfigHandle::with_config(sanitized, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No leafmatch config found; using built-in defaults.".to_string());
    MatcherConfigHandle::with_config(MatcherConfig::default(), None, warnings)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("LEAFMATCH_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("leafmatch").join(name));
        }
    }

    candidates
}

static MATCHER_CONFIG_HANDLE: OnceLock<MatcherConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global matcher configuration (loaded once per process).
pub fn matcher_config_handle() -> &'static MatcherConfigHandle {
    MATCHER_CONFIG_HANDLE.get_or_init(|| load_matcher_config(None))
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = matcher_config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[leafmatch] Loaded config from {}", source.display());
        } else {
            eprintln!("[leafmatch] Using built-in defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[leafmatch] Config warning: {}", warning);
        }
    });
}

/// Default directory of reference images (`~/leafmatch/references`).
pub fn default_reference_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("leafmatch").join("references"))
}

/// Default remedy catalog path (`~/leafmatch/remedies.yml`).
pub fn default_remedies_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("leafmatch").join("remedies.yml"))
}
