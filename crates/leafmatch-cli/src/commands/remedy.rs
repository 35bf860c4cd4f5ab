use std::path::PathBuf;

use leafmatch_core::config;
use leafmatch_core::remedies::{self, RemedyBook};

/// Resolve the remedy catalog path: explicit flag, then config file, then
/// the user-level default location.
fn resolve_book_path(file: Option<PathBuf>) -> Option<PathBuf> {
    file.or_else(|| config::matcher_config_handle().config.remedies.clone())
        .or_else(config::default_remedies_path)
}

/// Load the catalog at `path`, falling back to the builtin catalog when no
/// file exists yet.
fn load_book(path: Option<&PathBuf>) -> Result<RemedyBook, String> {
    match path {
        Some(p) if p.exists() => remedies::load_remedy_book(p),
        _ => Ok(RemedyBook::builtin()),
    }
}

/// List all labels with recorded remedies.
pub fn cmd_remedy_list(file: Option<PathBuf>) -> Result<(), String> {
    let path = resolve_book_path(file);
    let book = load_book(path.as_ref())?;

    if book.is_empty() {
        println!("No remedies recorded.");
    } else {
        for label in book.labels() {
            println!("  {}", label);
        }
    }
    Ok(())
}

/// Show the remedy recorded for a label.
pub fn cmd_remedy_show(label: String, file: Option<PathBuf>) -> Result<(), String> {
    let path = resolve_book_path(file);
    let book = load_book(path.as_ref())?;

    let label = label.to_lowercase();
    match book.lookup(&label) {
        Some(remedy) => {
            println!("{}: {}", label, remedy);
            Ok(())
        }
        None => Err(format!("No remedy recorded for '{}'", label)),
    }
}

/// Add or replace the remedy for a label and save the catalog.
pub fn cmd_remedy_add(label: String, text: String, file: Option<PathBuf>) -> Result<(), String> {
    let path = resolve_book_path(file)
        .ok_or_else(|| "Could not determine remedies file path".to_string())?;

    let mut book = load_book(Some(&path))?;
    let label = label.to_lowercase();
    book.insert(label.clone(), text);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create remedies directory: {}", e))?;
        }
    }

    remedies::save_remedy_book(&book, &path)?;
    println!("Recorded remedy for '{}' in {}", label, path.display());
    Ok(())
}
