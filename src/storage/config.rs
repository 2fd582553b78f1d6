//! Configuration handling
//!
//! Configuration lives in `~/.config/chore/config.toml`. The only
//! setting today is `db_path`; a missing file means defaults. The
//! effective store location is resolved as: `--db` flag (or `CHORE_DB`
//! env, handled by clap) > config file > platform data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// User configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the task database
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing config file is not an error; it yields defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Returns the default config file path for this platform
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "chore").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolves the effective database path.
    ///
    /// `flag` is the already-parsed `--db` value (clap also feeds
    /// `CHORE_DB` into it); it wins over the config file, which wins
    /// over the platform data directory.
    pub fn resolve_db_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path);
        }

        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("", "", "chore")
            .context("Could not determine a data directory for the task database")?;
        Ok(dirs.data_dir().join("chore.db"))
    }
}
