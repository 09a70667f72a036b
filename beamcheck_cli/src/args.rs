//! Command-line argument definitions for the beamcheck CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input model, the report path, the
//! width threshold, configuration file selection, and logging verbosity.

use clap::Parser;

/// Check IFC beams for minimum width and Eurocode 2 minimum-reinforcement capacity
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input IFC file
    #[arg(help = "Path to the input IFC file")]
    pub input: String,

    /// Path to the report file; `.json` writes JSON, anything else CSV.
    /// Defaults to `<input stem>.beam_check.csv` next to the input.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Minimum beam width in mm, overriding the configuration file
    #[arg(long)]
    pub min_width: Option<f64>,

    /// Only print the summary, no per-beam lines
    #[arg(long)]
    pub summary_only: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
