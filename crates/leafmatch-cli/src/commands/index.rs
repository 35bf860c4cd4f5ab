use std::path::PathBuf;

use leafmatch_cli::resolve_settings;

/// Build the reference index and print a summary of its contents.
pub fn cmd_index(
    references: Option<PathBuf>,
    bins: Option<usize>,
    verbose: bool,
) -> Result<(), String> {
    leafmatch_core::config::set_verbose(verbose);
    leafmatch_core::config::log_config_usage();

    let settings = resolve_settings(references, bins, None, None)?;

    println!(
        "Building reference index from {}...",
        settings.reference_dir.display()
    );
    let index = leafmatch_core::build_index(&settings.reference_dir, settings.bins_per_channel);

    if index.is_empty() {
        println!("No reference images loaded.");
        println!("Add .jpg/.jpeg/.png/.tif/.tiff files named after the disease they show,");
        println!("e.g. rust.jpg or leaf_blight.png");
        return Ok(());
    }

    println!(
        "\nReference index ({} bins per channel, {} total bins):",
        settings.bins_per_channel,
        settings.bins_per_channel.pow(3)
    );
    for entry in index.entries() {
        let occupied = entry
            .fingerprint
            .values
            .iter()
            .filter(|&&v| v > 0.0)
            .count();
        println!("  {:<24} {} occupied bins", entry.label, occupied);
    }
    println!("\n{} entries total", index.len());

    Ok(())
}
