//! Command-line interface definition and argument parsing.
//!
//! This module defines the command-line arguments using the
//! [clap](https://docs.rs/clap/) library. Helper methods on [`Cli`] accept a
//! [`FileConfig`] reference so that config-file values act as defaults that
//! command-line flags override.

use std::path::PathBuf;

use clap::Parser;

use dirsize::{
    DEFAULT_GATE_CAPACITY,
    config::{FileConfig, ScanOptions},
    utils::SizeFormatter,
};

/// Main command-line interface structure.
#[derive(Parser, Debug)]
#[command(name = "dirsize")]
#[command(about = "Total the file sizes of one or more directory trees")]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Directories or files to size
    ///
    /// Each path is walked independently and gets its own row in the report.
    /// Paths are not deduplicated.
    #[arg(num_args = 0..)]
    paths: Vec<PathBuf>,

    /// Print the size of every entry below each path while walking
    ///
    /// Progress lines are printed as entries are visited and may interleave
    /// with error messages. Totals are the same with or without this flag.
    #[arg(long)]
    recursive: bool,

    /// Display sizes in human-readable units (B, K, M, G, T, P, E)
    ///
    /// Without this flag sizes are shown as whole kilobytes.
    #[arg(long)]
    human: bool,

    /// Maximum number of paths walked at the same time
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u64).range(1..))]
    concurrency: Option<u64>,

    /// Number of threads used to print progress lines
    ///
    /// A value of 0 uses the default number of threads (typically the number
    /// of CPU cores).
    #[arg(short = 't', long)]
    threads: Option<usize>,
}

impl Cli {
    /// The root targets, in the order given.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Resolve the size formatter.
    ///
    /// `--human` wins when set; otherwise the config file decides; otherwise
    /// raw kilobytes.
    #[must_use]
    pub fn formatter(&self, config: &FileConfig) -> SizeFormatter {
        SizeFormatter::from_human(self.human || config.human.unwrap_or(false))
    }

    /// Extract scanning options from CLI args and config file.
    ///
    /// - **recursive**: CLI flag `||` config value `||` `false`
    /// - **concurrency**: CLI > config > [`DEFAULT_GATE_CAPACITY`]
    /// - **threads**: CLI > config > `0`
    #[must_use]
    pub fn scan_options(&self, config: &FileConfig) -> ScanOptions {
        let concurrency = self
            .concurrency
            .and_then(|n| usize::try_from(n).ok())
            .or(config.scanning.concurrency)
            .unwrap_or(DEFAULT_GATE_CAPACITY)
            .max(1);

        ScanOptions {
            recursive: self.recursive || config.recursive.unwrap_or(false),
            concurrency,
            threads: self.threads.or(config.scanning.threads).unwrap_or(0),
        }
    }
}
