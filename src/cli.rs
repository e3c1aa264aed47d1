//! Command-line interface implementation for gearspec.
//! Provides argument parsing and help text formatting using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for gearspec.
#[derive(Parser, Debug)]
#[command(about = "gearspec: generate gear-ready RPM spec directories", long_about = None)]
pub struct Args {
    /// Module name to package
    #[arg(value_name = "MODULE")]
    pub module: Option<String>,

    /// Spec template type (e.g. python3, perl, ruby)
    #[arg(short = 't', long, default_value = "default")]
    pub spec_type: String,

    /// Package version
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// One-line package summary
    #[arg(long)]
    pub summary: Option<String>,

    /// Package license
    #[arg(long)]
    pub license: Option<String>,

    /// Upstream URL; with --git, also the clone source
    #[arg(long)]
    pub url: Option<String>,

    /// Package description
    #[arg(long)]
    pub description: Option<String>,

    /// Changelog entry text
    #[arg(long)]
    pub lastchange: Option<String>,

    /// Upstream tag to base the packaging branch on.
    /// Defaults to the most recent tag reachable in the clone.
    #[arg(long)]
    pub tag: Option<String>,

    /// Clone the upstream repository instead of packaging the working
    /// directory
    #[arg(short, long)]
    pub git: bool,

    /// Self-test: run a full deploy in a scratch directory and compare it
    /// against the given reference directory
    #[arg(long, value_name = "REF_DIR")]
    pub test: Option<PathBuf>,

    /// Changelog date in YYYY-MM-DD form; defaults to today
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Never prompt; missing fields stay empty
    #[arg(short, long)]
    pub batch: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// Every field is optional or defaulted (missing ones are asked for
/// interactively later), so parsing only fails on invalid input.
///
/// # Exits
/// * With clap's default error handling on invalid arguments
pub fn get_args() -> Args {
    Args::parse()
}
