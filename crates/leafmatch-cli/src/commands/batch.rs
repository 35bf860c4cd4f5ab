use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use leafmatch_cli::{
    expand_inputs, load_remedies, match_single_image, resolve_settings, MatchReport,
};

#[allow(clippy::too_many_arguments)]
pub fn cmd_batch(
    inputs: Vec<PathBuf>,
    recursive: bool,
    references: Option<PathBuf>,
    bins: Option<usize>,
    min_score: Option<f32>,
    remedies: Option<PathBuf>,
    threads: Option<usize>,
    output: Option<PathBuf>,
    silent: bool,
    verbose: bool,
) -> Result<(), String> {
    let batch_start = Instant::now();

    // Set verbose mode for core library
    leafmatch_core::config::set_verbose(verbose);
    if verbose {
        leafmatch_core::config::log_config_usage();
    }

    if inputs.is_empty() {
        return Err("No input files or directories specified".to_string());
    }

    // Expand directories to file lists
    let inputs = expand_inputs(&inputs, recursive)?;

    if inputs.is_empty() {
        return Err(
            "No supported image files found (supported: .jpg, .jpeg, .png, .tif, .tiff)"
                .to_string(),
        );
    }

    if !silent {
        println!("Found {} image files to match", inputs.len());
    }

    // Configure thread pool if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        if !silent {
            println!("Using {} threads for parallel matching", num_threads);
        }
    }

    let settings = resolve_settings(references, bins, min_score, remedies)?;

    // Build the index once, before the parallel phase; workers only read it
    if !silent {
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
    } else if !silent {
        println!("  {} reference entries loaded\n", index.len());
    }

    let remedy_book = load_remedies(&settings)?;

    // Progress tracking
    let processed_count = AtomicUsize::new(0);
    let matched_count = AtomicUsize::new(0);
    let total_files = inputs.len();

    // Match files in parallel
    let results: Vec<Result<MatchReport, String>> = inputs
        .par_iter()
        .map(|input| {
            let report = match_single_image(input, &index, &remedy_book, settings.min_score)?;

            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            if report.matched {
                matched_count.fetch_add(1, Ordering::SeqCst);
            }

            if !silent {
                match (&report.disease, report.score) {
                    (Some(disease), Some(score)) => println!(
                        "[{}/{}] {}: {} (score {:.3})",
                        count,
                        total_files,
                        input.display(),
                        disease,
                        score
                    ),
                    (None, Some(score)) => println!(
                        "[{}/{}] {}: no match (best score {:.3})",
                        count,
                        total_files,
                        input.display(),
                        score
                    ),
                    _ => println!("[{}/{}] {}: no match", count, total_files, input.display()),
                }
            }

            Ok(report)
        })
        .collect();

    // Summarize results
    let mut reports = Vec::new();
    let mut errors: Vec<(PathBuf, String)> = Vec::new();

    for (input, result) in inputs.iter().zip(results.into_iter()) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => errors.push((input.clone(), e)),
        }
    }

    // Save to JSON if requested
    if let Some(output_path) = &output {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("Failed to serialize results: {}", e))?;
        std::fs::write(output_path, json)
            .map_err(|e| format!("Failed to write output file: {}", e))?;
        if !silent {
            println!("\nResults saved to: {}", output_path.display());
        }
    }

    let batch_elapsed = batch_start.elapsed();

    if !silent {
        println!("\n========================================");
        println!("BATCH MATCHING COMPLETE");
        println!("========================================");
        println!("  Images:     {}", total_files);
        println!("  Matched:    {}", matched_count.load(Ordering::SeqCst));
        println!("  Failed:     {}", errors.len());
        println!("  Total time: {:.2}s", batch_elapsed.as_secs_f64());

        if !errors.is_empty() {
            println!("\nErrors:");
            for (path, error) in &errors {
                println!("  {}: {}", path.display(), error);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} files failed to match", errors.len()))
    }
}
