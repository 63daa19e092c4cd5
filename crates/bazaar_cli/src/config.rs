//! Bazaar configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "bazaar.toml";

/// Top-level Bazaar configuration (bazaar.toml)
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct BazaarConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the local and shared theme tiers live
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Device-local key/value file
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,
    /// Root directory of the shared settings tables
    #[serde(default = "default_remote_dir")]
    pub remote_dir: PathBuf,
}

fn default_local_path() -> PathBuf {
    PathBuf::from(".bazaar/local.json")
}

fn default_remote_dir() -> PathBuf {
    PathBuf::from(".bazaar/remote")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
            remote_dir: default_remote_dir(),
        }
    }
}

/// Rendered output
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Stylesheet holding the resolved `:root` block
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,
}

fn default_stylesheet() -> PathBuf {
    PathBuf::from("theme.css")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            stylesheet: default_stylesheet(),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl BazaarConfig {
    /// Load configuration from a file or a directory containing bazaar.toml.
    ///
    /// Returns `None` when there is no file. Relative paths inside the file
    /// are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: BazaarConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Some(config.rooted_at(base)))
    }

    fn rooted_at(mut self, base: &Path) -> Self {
        for path in [
            &mut self.storage.local_path,
            &mut self.storage.remote_dir,
            &mut self.output.stylesheet,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
