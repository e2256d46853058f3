//! Scanning configuration for directory traversal.
//!
//! This module defines the options that control how root targets are walked
//! and how many walks may run at the same time.

use crate::aggregator::DEFAULT_GATE_CAPACITY;

/// Configuration for directory scanning behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Print one progress line per visited entry below each root
    pub recursive: bool,

    /// Maximum number of walks allowed to run at once (admission gate capacity)
    pub concurrency: usize,

    /// Number of threads in the progress task pool (0 = rayon default)
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            concurrency: DEFAULT_GATE_CAPACITY,
            threads: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_options_default() {
        let opts = ScanOptions::default();

        assert!(!opts.recursive);
        assert_eq!(opts.concurrency, 20);
        assert_eq!(opts.threads, 0);
    }

    #[test]
    fn test_scan_options_clone() {
        let original = ScanOptions {
            recursive: true,
            concurrency: 4,
            threads: 2,
        };
        let cloned = original.clone();

        assert_eq!(original, cloned);
    }
}
