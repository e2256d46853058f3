//! # dirsize
//!
//! Total the file sizes under one or more directory trees, walking every
//! tree in parallel.
//!
//! Each root target is walked on its own worker thread, with a shared
//! admission gate capping how many walks run at once. Walk results are
//! gathered in completion order into a two-column table followed by a grand
//! total.
//!
//! ## Features
//!
//! - Parallel walks across root targets with bounded concurrency
//! - Optional per-entry progress lines (`--recursive`)
//! - Raw kilobyte or human-readable output (`--human`)
//! - Traversal errors are reported and skipped, never fatal
//! - Persistent defaults via `~/.config/dirsize/config.toml`
//!
//! ## Usage
//!
//! ```bash
//! # Total two trees
//! dirsize ~/Projects /var/log
//!
//! # Human-readable sizes with a line per visited entry
//! dirsize --human --recursive ~/Downloads
//! ```

pub mod aggregator;
pub mod config;
pub mod output;
pub mod report;
pub mod utils;
pub mod walker;

use std::{io::Write, path::PathBuf, thread};

use crossbeam_channel::unbounded;

pub use aggregator::{AdmissionGate, DEFAULT_GATE_CAPACITY, DirectoryAggregator, WalkResult};
pub use config::{FileConfig, ScanOptions};
pub use output::{BufferSink, OutputSink, StdoutSink};
pub use report::{Report, ReportCollector, TableWriter};
pub use utils::SizeFormatter;
pub use walker::{TreeWalker, WalkSummary};

/// Size every root and write the report table to `out`.
///
/// Walks run on background threads while the calling thread collects their
/// results, so rows are written in completion order. Progress lines and
/// diagnostics go to `sink` as they happen and may interleave with the table
/// when both share a terminal.
///
/// # Errors
///
/// Returns an error only if writing the table to `out` fails. Traversal
/// problems are reported through `sink` and recorded in the [`Report`].
pub fn measure<W: Write>(
    roots: &[PathBuf],
    options: &ScanOptions,
    formatter: SizeFormatter,
    sink: &dyn OutputSink,
    out: W,
) -> std::io::Result<Report> {
    let aggregator =
        DirectoryAggregator::new(options.concurrency, formatter, options.recursive, sink);
    let (tx, rx) = unbounded();

    thread::scope(|s| {
        s.spawn(|| aggregator.run(roots, tx));
        ReportCollector::new(out, formatter).collect(&rx)
    })
}
