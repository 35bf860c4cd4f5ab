use std::path::PathBuf;

use leafmatch_cli::{load_remedies, match_single_image, resolve_settings, MatchReport};

/// Identify the closest disease match for a single leaf image.
pub fn cmd_identify(
    input: PathBuf,
    references: Option<PathBuf>,
    bins: Option<usize>,
    min_score: Option<f32>,
    remedies: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> Result<(), String> {
    leafmatch_core::config::set_verbose(verbose);
    leafmatch_core::config::log_config_usage();

    let settings = resolve_settings(references, bins, min_score, remedies)?;

    if !json {
        println!(
            "Building reference index from {}...",
            settings.reference_dir.display()
        );
    }
    let index = leafmatch_core::build_index(&settings.reference_dir, settings.bins_per_channel);

    if index.is_empty() {
        eprintln!(
            "Warning: no reference images loaded from {}",
            settings.reference_dir.display()
        );
    } else if !json {
        println!("  {} reference entries loaded", index.len());
    }

    let remedy_book = load_remedies(&settings)?;

    let report = match_single_image(&input, &index, &remedy_book, settings.min_score)?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize result: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    print_report(&report);
    Ok(())
}

/// Print a match report in human-readable form.
fn print_report(report: &MatchReport) {
    if report.matched {
        let disease = report.disease.as_deref().unwrap_or("unknown");
        println!(
            "Disease: {} (score {:.3})",
            disease,
            report.score.unwrap_or(-1.0)
        );
        match &report.remedy {
            Some(remedy) => println!("Remedy:  {}", remedy),
            None => println!(
                "Remedy:  none recorded for this label (add one with `leafmatch remedy add`)"
            ),
        }
    } else {
        match report.score {
            Some(score) => println!("No close disease match found (best score {:.3})", score),
            None => println!("No close disease match found (reference index is empty)"),
        }
    }
}
