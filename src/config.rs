//! Configuration for repositories and stores
//!
//! Handles loading `criteria.toml`:
//!
//! ```toml
//! [repository]
//! max_relation_depth = 8
//!
//! [sqlite]
//! path = "app.db"
//! foreign_keys = true
//! case_sensitive_like = true
//! busy_timeout_ms = 5000
//! ```
//!
//! Every key is optional. Without `sqlite.path` the store is an in-memory database.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "criteria.toml";

// ============================================================================
// Sections
// ============================================================================

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub sqlite: SqliteConfig,
}

/// `[repository]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// How many relation levels are loaded below a fetched entity
    pub max_relation_depth: usize,
}

impl RepositoryConfig {
    pub const DEFAULT_MAX_RELATION_DEPTH: usize = 8;
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            max_relation_depth: Self::DEFAULT_MAX_RELATION_DEPTH,
        }
    }
}

/// `[sqlite]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqliteConfig {
    /// Database file; `None` opens an in-memory database
    pub path: Option<PathBuf>,
    pub foreign_keys: bool,
    pub case_sensitive_like: bool,
    pub busy_timeout_ms: u32,
}

impl SqliteConfig {
    /// In-memory database with the default pragmas.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File-backed database with the default pragmas.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: None,
            foreign_keys: true,
            case_sensitive_like: true,
            busy_timeout_ms: 5000,
        }
    }
}

// ============================================================================
// Config implementation
// ============================================================================

impl Config {
    /// Load from default config file
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.into())
            } else {
                ConfigError::Io(path.into(), e)
            }
        })?;

        Self::parse(&content, path.display().to_string())
    }

    /// Parse configuration text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "inline configuration".to_owned())
    }

    fn parse(content: &str, origin: String) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|source| ConfigError::Parse { origin, source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.max_relation_depth == 0 {
            return Err(ConfigError::Invalid(
                "repository.max_relation_depth must be at least 1".into(),
            ));
        }

        if let Some(path) = &self.sqlite.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "sqlite.path must not be empty, omit it for an in-memory database".into(),
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Tests
// ============================================================================
