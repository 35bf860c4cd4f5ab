use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{
    cmd_batch, cmd_identify, cmd_index, cmd_init, cmd_remedy_add, cmd_remedy_list, cmd_remedy_show,
};

#[derive(Parser)]
#[command(name = "leafmatch")]
#[command(version, about = "Crop disease matcher using color-histogram similarity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the closest disease match for a leaf image
    Identify {
        /// Input image (jpg, jpeg, png, tif, tiff)
        #[arg(value_name = "IMAGE")]
        input: PathBuf,

        /// Directory of labeled reference images
        #[arg(short, long, value_name = "DIR")]
        references: Option<PathBuf>,

        /// Histogram bins per color channel
        #[arg(long, value_name = "N")]
        bins: Option<usize>,

        /// Minimum similarity score required to report a match
        #[arg(long, value_name = "SCORE")]
        min_score: Option<f32>,

        /// Remedy catalog file
        #[arg(long, value_name = "FILE")]
        remedies: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Match multiple images against the reference set
    Batch {
        /// Input files or directories
        #[arg(value_name = "INPUTS")]
        inputs: Vec<PathBuf>,

        /// Scan input directories recursively
        #[arg(short = 'R', long)]
        recursive: bool,

        /// Directory of labeled reference images
        #[arg(short, long, value_name = "DIR")]
        references: Option<PathBuf>,

        /// Histogram bins per color channel
        #[arg(long, value_name = "N")]
        bins: Option<usize>,

        /// Minimum similarity score required to report a match
        #[arg(long, value_name = "SCORE")]
        min_score: Option<f32>,

        /// Remedy catalog file
        #[arg(long, value_name = "FILE")]
        remedies: Option<PathBuf>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Write per-file results to a JSON file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Suppress per-file progress output
        #[arg(long)]
        silent: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Build the reference index and print a summary
    Index {
        /// Directory of labeled reference images
        #[arg(short, long, value_name = "DIR")]
        references: Option<PathBuf>,

        /// Histogram bins per color channel
        #[arg(long, value_name = "N")]
        bins: Option<usize>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Manage the disease remedy catalog
    Remedy {
        #[command(subcommand)]
        action: RemedyAction,
    },

    /// Initialize the user configuration directory
    Init {
        /// Overwrite existing configuration files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum RemedyAction {
    /// List all labels with recorded remedies
    List {
        /// Remedy catalog file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Show the remedy recorded for a label
    Show {
        /// Disease label
        label: String,

        /// Remedy catalog file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Add or replace the remedy for a label
    Add {
        /// Disease label
        label: String,

        /// Remedy text
        text: String,

        /// Remedy catalog file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Identify {
            input,
            references,
            bins,
            min_score,
            remedies,
            json,
            verbose,
        } => cmd_identify(input, references, bins, min_score, remedies, json, verbose),
        Commands::Batch {
            inputs,
            recursive,
            references,
            bins,
            min_score,
            remedies,
            threads,
            output,
            silent,
            verbose,
        } => cmd_batch(
            inputs, recursive, references, bins, min_score, remedies, threads, output, silent,
            verbose,
        ),
        Commands::Index {
            references,
            bins,
            verbose,
        } => cmd_index(references, bins, verbose),
        Commands::Remedy { action } => match action {
            RemedyAction::List { file } => cmd_remedy_list(file),
            RemedyAction::Show { label, file } => cmd_remedy_show(label, file),
            RemedyAction::Add { label, text, file } => cmd_remedy_add(label, text, file),
        },
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
