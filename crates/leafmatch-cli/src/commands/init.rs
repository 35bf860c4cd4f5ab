use std::path::PathBuf;

use leafmatch_core::remedies::{save_remedy_book, RemedyBook};

const DEFAULT_CONFIG: &str = "\
# leafmatch configuration
#
# Matcher parameters. The values below are the built-in defaults.
defaults:
  # Histogram bins per color channel (8^3 = 512 total bins)
  bins_per_channel: 8
  # Minimum correlation score required to accept a match
  min_score: 0.15

# Directory of labeled reference images. Filenames become labels:
# rust.jpg -> \"rust\". Defaults to ~/leafmatch/references when unset.
# reference_dir: /var/lib/leafmatch/references

# Remedy catalog file. The builtin catalog is used when unset.
# remedies: /var/lib/leafmatch/remedies.yml
";

/// Initialize the user configuration directory.
///
/// Creates `~/leafmatch/` with a starter config, an empty reference image
/// directory, and the builtin remedy catalog. Safe to run multiple times -
/// won't overwrite existing files unless `force` is true.
pub fn cmd_init(force: bool) -> Result<(), String> {
    let home = std::env::var("HOME").map_err(|_| "Could not determine home directory")?;
    let leafmatch_dir = PathBuf::from(&home).join("leafmatch");
    let references_dir = leafmatch_dir.join("references");

    println!(
        "Initializing leafmatch configuration in: {}",
        leafmatch_dir.display()
    );
    println!();

    std::fs::create_dir_all(&references_dir)
        .map_err(|e| format!("Failed to create references directory: {}", e))?;
    println!("  Created: references/");

    let config_path = leafmatch_dir.join("leafmatch.yml");
    if !config_path.exists() || force {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| format!("Failed to write leafmatch.yml: {}", e))?;
        println!("  Wrote: leafmatch.yml");
    } else {
        println!("  Skipped: leafmatch.yml (already exists, use --force to overwrite)");
    }

    let remedies_path = leafmatch_dir.join("remedies.yml");
    if !remedies_path.exists() || force {
        let book = RemedyBook::builtin();
        save_remedy_book(&book, &remedies_path)?;
        println!("  Wrote: remedies.yml ({} builtin remedies)", book.len());
    } else {
        println!("  Skipped: remedies.yml (already exists, use --force to overwrite)");
    }

    println!();
    println!("Initialization complete!");
    println!();
    println!("Next steps:");
    println!("  1. Copy labeled reference images into {}", references_dir.display());
    println!("     (filenames become labels: rust.jpg -> \"rust\")");
    println!("  2. Run: leafmatch identify photo.jpg");

    Ok(())
}
