//! dnacom CLI: centre-of-mass analysis of a confined DNA molecule.
//!
//! Usage:
//!   dnacom analyze <STACK>      Full pipeline: centroids, velocities, video, histograms
//!   dnacom video <STACK>        Looping overlay (or plain grayscale) video only
//!   dnacom histogram <STACK>    Velocity histograms only
//!   dnacom info <STACK>         Show stack and timing information
//!   dnacom config               Show (or write) the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dnacom_common::config::{AppConfig, BinRule};

mod commands;

use commands::TimingArgs;

#[derive(Parser)]
#[command(
    name = "dnacom",
    about = "Centre-of-mass trajectory of a DNA molecule from a TIFF stack",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the trajectory and write the video and histograms
    Analyze {
        /// Background-subtracted multi-page TIFF
        stack: PathBuf,

        #[command(flatten)]
        timing: TimingArgs,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Histogram bins: auto, sturges or a count
        #[arg(long)]
        bins: Option<BinRule>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the looping video
    Video {
        /// Background-subtracted multi-page TIFF
        stack: PathBuf,

        /// Output file (or directory for a PNG sequence)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the centroid marker
        #[arg(long)]
        grayscale: bool,
    },

    /// Write the velocity histograms
    Histogram {
        /// Background-subtracted multi-page TIFF
        stack: PathBuf,

        #[command(flatten)]
        timing: TimingArgs,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Histogram bins: auto, sturges or a count
        #[arg(long)]
        bins: Option<BinRule>,
    },

    /// Show stack information
    Info {
        /// Background-subtracted multi-page TIFF
        stack: PathBuf,

        /// Acquisition metadata file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the user config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    dnacom_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Analyze {
            stack,
            timing,
            output,
            bins,
            json,
        } => commands::analyze::run(stack, timing, output, bins, json, &config),
        Commands::Video {
            stack,
            output,
            grayscale,
        } => commands::video::run(stack, output, grayscale, &config),
        Commands::Histogram {
            stack,
            timing,
            output,
            bins,
        } => commands::histogram::run(stack, timing, output, bins, &config),
        Commands::Info { stack, metadata } => commands::info::run(stack, metadata),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
