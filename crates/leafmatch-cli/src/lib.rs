//! Shared utilities for leafmatch-cli
//!
//! Reusable functions shared between the CLI commands.

pub mod processing;

pub use processing::{
    expand_inputs, load_remedies, match_single_image, resolve_settings, MatchReport,
    MatcherSettings, SUPPORTED_EXTENSIONS,
};
