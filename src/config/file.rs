//! Configuration file support for persistent settings.
//!
//! Settings are read from a TOML file located at
//! `~/.config/dirsize/config.toml` (or the platform-specific equivalent).
//! Values from the file serve as defaults that command-line flags override.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! human = true
//! recursive = false
//!
//! [scanning]
//! concurrency = 20
//! threads = 0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can tell which values the file actually
/// sets and layer them under the command line.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Use the human-readable size format by default
    pub human: Option<bool>,

    /// Print per-entry progress lines by default
    pub recursive: Option<bool>,

    /// Scanning options
    #[serde(default)]
    pub scanning: FileScanConfig,
}

/// Scanning options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileScanConfig {
    /// Admission gate capacity (concurrent walks)
    pub concurrency: Option<usize>,

    /// Number of threads in the progress task pool
    pub threads: Option<usize>,
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The file lives at `<config_dir>/dirsize/config.toml`, where
    /// `<config_dir>` is the platform-specific configuration directory.
    /// Returns `None` if that directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dirsize").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// A missing file yields the default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML
    /// or unexpected fields.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })
    }
}
