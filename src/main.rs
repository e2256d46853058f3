//! # dirsize
//!
//! Print the total file size of each path given on the command line, then a
//! grand total.
//!
//! ## Usage
//!
//! ```bash
//! dirsize [--recursive] [--human] <PATH>...
//! ```

mod cli;

use std::{io, process::exit};

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use dirsize::{FileConfig, StdoutSink};

/// Entry point for the dirsize application.
///
/// Errors from [`inner_main`] are printed to stderr before exiting with a
/// non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// Parses arguments, layers the config file underneath them, then walks
/// every path and prints the report. Traversal errors are printed as they
/// occur and do not change the exit status.
///
/// # Errors
///
/// Returns errors from thread-pool configuration or from writing the report.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if args.roots().is_empty() {
        println!("Please provide at least one directory");
        exit(1);
    }

    let file_config = load_config();
    let formatter = args.formatter(&file_config);
    let scan_options = args.scan_options(&file_config);

    if scan_options.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(scan_options.threads)
            .build_global()?;
    }

    let report = dirsize::measure(
        args.roots(),
        &scan_options,
        formatter,
        &StdoutSink,
        io::stdout(),
    )?;

    if let Some(summary) = report.error_summary() {
        eprintln!("{} {summary}", "Warning:".yellow());
    }

    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config() -> FileConfig {
    FileConfig::load().unwrap_or_else(|e| {
        eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
        FileConfig::default()
    })
}
