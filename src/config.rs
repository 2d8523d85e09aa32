//! Configuration loading and management
//!
//! Handles parsing of `.tt.toml` configuration files. Every field is
//! optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::query::{FilterKey, SortKey};

pub const CONFIG_FILENAME: &str = ".tt.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Check store configuration
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Session defaults
    #[serde(default)]
    pub session: SessionConfig,
}

/// Check store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Prefix for ids of newly created checks
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Length of the random id suffix
    #[serde(default = "default_id_len")]
    pub id_len: usize,

    /// Checks per page in listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Load the demo checks at startup
    #[serde(default = "default_true")]
    pub seed_demo: bool,
}

fn default_id_prefix() -> String {
    "chk".to_string()
}

fn default_id_len() -> usize {
    6
}

fn default_page_size() -> usize {
    4
}

fn default_true() -> bool {
    true
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            id_len: default_id_len(),
            page_size: default_page_size(),
            seed_demo: true,
        }
    }
}

/// Session defaults, restored on every logout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_filter")]
    pub default_filter: FilterKey,

    #[serde(default = "default_sort")]
    pub default_sort: SortKey,
}

fn default_filter() -> FilterKey {
    FilterKey::All
}

fn default_sort() -> SortKey {
    SortKey::Name
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_filter: default_filter(),
            default_sort: default_sort(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tt.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.tt.toml` from `dir`, or return defaults when it is absent
    pub fn load_from_dir(dir: &Path) -> crate::error::Result<Self> {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve an explicit path, falling back to the working directory
    pub fn resolve(explicit: Option<&PathBuf>) -> crate::error::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let cwd = std::env::current_dir()?;
                Self::load_from_dir(&cwd)
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the store and session cannot work with
    pub fn validate(&self) -> crate::error::Result<()> {
        self.tasks.validate()
    }
}

impl TasksConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_prefix must be alphanumeric".to_string(),
            ));
        }
        if self.id_len < 4 {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_len must be >= 4".to_string(),
            ));
        }
        if self.id_len > 16 {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_len must be <= 16".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.page_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
