//! Configuration for the `interchain` CLI
//!
//! Read from `--config <path>` or `interchain.toml` in the working directory.
//! Every field has a default, so a partial file is fine.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use interchain_migrate::TransformOptions;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "interchain.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings passed to every transform
    pub transform: TransformOptions,
    /// File tool settings
    pub tool: ToolConfig,
}

/// Settings for the file migration tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Files outside this directory are rejected
    pub root_dir: PathBuf,
    /// Set to false to never write migrated files
    pub write_back: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            write_back: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default file when present.
    ///
    /// # Errors
    /// Fails when an explicit path is missing or any file is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                Self::from_file(path)
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }
}
