//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Crowdcheck: data-quality checks for crowdfunding campaign tables
#[derive(Parser)]
#[command(name = "crowdcheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Business rules file (JSON); defaults are used when omitted
    #[arg(short, long, global = true, value_name = "RULES")]
    pub rules: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the raw-data suite against a campaign snapshot
    Validate {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the suite as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the suite as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Filter a snapshot to in-scope campaigns and validate the result
    Filter {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the filtered table (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Write the filtered-data suite as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Profile a data file and suggest expectations
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective business rules as JSON
    Rules,
}
