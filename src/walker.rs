//! Single-tree traversal and size accumulation.
//!
//! A [`TreeWalker`] visits every entry below one root, adds the size of each
//! non-directory entry to a private running total, and, in recursive mode,
//! emits one progress line per visited entry. Traversal errors never abort a
//! walk: they are reported through the [`OutputSink`] and counted.

use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

use walkdir::WalkDir;

use crate::{output::OutputSink, utils::SizeFormatter};

/// Outcome of walking one root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Sum of the sizes of every non-directory entry visited, in bytes.
    pub size: u64,

    /// Number of entries that could not be read.
    pub errors: usize,

    /// Whether the root itself could not be traversed.
    pub root_failed: bool,
}

/// Walks one directory tree and totals its file sizes.
///
/// The walker is cheap to construct and holds no per-walk state, so one
/// instance can walk any number of roots, including concurrently.
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'a> {
    formatter: SizeFormatter,
    recursive: bool,
    sink: &'a dyn OutputSink,
}

impl<'a> TreeWalker<'a> {
    /// Create a walker that reports through `sink`.
    ///
    /// * `formatter` - renders the per-entry size in progress lines
    /// * `recursive` - when `true`, print a progress line for every entry
    ///   below the root
    #[must_use]
    pub const fn new(
        formatter: SizeFormatter,
        recursive: bool,
        sink: &'a dyn OutputSink,
    ) -> Self {
        Self {
            formatter,
            recursive,
            sink,
        }
    }

    /// Walk `root` depth-first and return its total size.
    ///
    /// Directories (the root included) never contribute to the total, and a
    /// file passed as `root` counts as a tree of one entry. Sibling order is
    /// whatever the filesystem yields.
    ///
    /// Traversal happens on the calling thread; progress lines are printed by
    /// tasks spawned on the rayon pool. This method does not return until
    /// every one of them has finished.
    ///
    /// Errors are reported and counted rather than returned. A root that
    /// cannot be traversed at all yields a summary with `root_failed` set and
    /// whatever size was gathered before the failure (usually zero).
    #[must_use]
    pub fn walk(&self, root: &Path) -> WalkSummary {
        let total = AtomicU64::new(0);
        let sink = self.sink;
        let formatter = self.formatter;
        let recursive = self.recursive;

        let (errors, root_failed) = rayon::in_place_scope(|scope| {
            let mut errors = 0usize;
            let mut root_failed = false;

            for entry in WalkDir::new(root) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        errors += 1;
                        root_failed |= err.depth() == 0;
                        let path = err.path().unwrap_or(root);
                        sink.diagnostic(&format!(
                            "Error accessing {}: {}",
                            path.display(),
                            describe(&err)
                        ));
                        continue;
                    }
                };

                let metadata = match entry.metadata() {
                    Ok(metadata) => metadata,
                    Err(err) => {
                        errors += 1;
                        sink.diagnostic(&format!(
                            "Error accessing {}: {}",
                            entry.path().display(),
                            describe(&err)
                        ));
                        continue;
                    }
                };

                let entry_size = metadata.len();
                if !metadata.is_dir() {
                    total.fetch_add(entry_size, Ordering::Relaxed);
                }

                if recursive && entry.depth() > 0 {
                    let path = entry.into_path();
                    scope.spawn(move |_| sink.progress(&path, &formatter.format(entry_size)));
                }
            }

            (errors, root_failed)
        });

        WalkSummary {
            size: total.into_inner(),
            errors,
            root_failed,
        }
    }
}

/// Prefer the underlying I/O error text; walkdir's own message repeats the path.
fn describe(err: &walkdir::Error) -> String {
    err.io_error().map_or_else(|| err.to_string(), ToString::to_string)
}
