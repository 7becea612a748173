// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration
//!
//! Loaded from a TOML file. Every section and field has a default, so an
//! empty file yields an in-memory ledger with a catalog that never reports
//! a collection as gone.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageConfig,
    pub service: ServiceConfig,
    pub gc: GcConfig,
    pub purge: PurgeConfig,
    pub catalog: CatalogConfig,
}

/// Where the ledger keeps its data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the journal and snapshot; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
}

/// Request path limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Upper bound on records returned by one pull
    pub max_pull_batch: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_pull_batch: 1000,
        }
    }
}

/// Garbage collection of catalog-absent collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GcConfig {
    /// How often the daemon runs a collection pass
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Ids sent to the catalog per existence check
    pub catalog_batch_size: usize,
    /// Offsets deleted per statement while removing a collection
    pub delete_batch_size: u64,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            catalog_batch_size: 5000,
            delete_batch_size: 1000,
        }
    }
}

/// Reclamation of compacted prefixes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PurgeConfig {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Catalog consulted by garbage collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Existence-check endpoint; `None` disables deletion entirely
    pub url: Option<String>,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML config text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.max_pull_batch == 0 {
            return Err(ConfigError::Invalid(
                "service.max_pull_batch must be at least 1".to_string(),
            ));
        }
        if self.gc.catalog_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "gc.catalog_batch_size must be at least 1".to_string(),
            ));
        }
        if self.gc.delete_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "gc.delete_batch_size must be at least 1".to_string(),
            ));
        }
        if self.gc.interval.is_zero() || self.purge.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "gc.interval and purge.interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
