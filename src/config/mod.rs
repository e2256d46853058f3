//! Configuration types for a sizing run.
//!
//! [`ScanOptions`] carries the resolved settings used by the walker and the
//! aggregator. [`FileConfig`] is the optional on-disk layer that supplies
//! defaults for any setting not given on the command line.

pub mod file;
pub mod scan;

pub use file::FileConfig;
pub use scan::ScanOptions;
