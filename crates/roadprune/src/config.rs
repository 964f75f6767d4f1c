//! Configuration management for roadprune.
//!
//! Configuration is read from a YAML file:
//!
//! ```yaml
//! database: data/roads.db
//! tables:
//!   nodes: ways_vertices_pgr
//!   edges: ways
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::TableNames;
use crate::error::{Error, Result};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "roadprune.yaml";

/// Configuration file structure for roadprune
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RoadpruneConfig {
    /// Path to the `SQLite` database holding the road network
    pub database: Option<PathBuf>,

    /// Node and edge table names
    pub tables: TableNames,
}

impl RoadpruneConfig {
    /// Parse and validate configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for malformed YAML, unknown keys, or invalid
    /// table names.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// A relative `database` path is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read config {}: {e}", path.display()),
            ))
        })?;
        let mut config = Self::from_yaml_str(&content)?;

        if let (Some(database), Some(dir)) = (&config.database, path.parent()) {
            if database.is_relative() {
                config.database = Some(dir.join(database));
            }
        }

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `roadprune.yaml` from `dir` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            debug!(dir = %dir.display(), "No configuration file; using defaults");
            Ok(Self::default())
        }
    }

    /// Check the table names.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first invalid name.
    pub fn validate(&self) -> Result<()> {
        self.tables.validate()
    }
}
