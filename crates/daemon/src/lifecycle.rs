// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, periodic maintenance, shutdown.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use rl_adapters::{
    CatalogAdapter, CatalogError, HttpCatalogAdapter, NoOpCatalogAdapter, TracedCatalogAdapter,
};
use rl_core::{CollectionId, SystemClock};
use rl_engine::{GarbageCollector, GcReport, LogService, PurgeReport};
use rl_storage::LocalStore;
use thiserror::Error;
use tracing::{info, warn};

/// Log service with the daemon's concrete types
pub type DaemonService = LogService<LocalStore, SystemClock>;

/// Garbage collector with the daemon's concrete types
pub type DaemonCollector = GarbageCollector<LocalStore, DaemonCatalog>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings loaded from the TOML file (or defaults)
    pub settings: rl_core::Config,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Config {
    /// Load settings from `path`, or use defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self, LifecycleError> {
        let settings = match path {
            Some(path) => rl_core::Config::load(path)?,
            None => rl_core::Config::default(),
        };
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: rl_core::Config) -> Result<Self, LifecycleError> {
        // Durable stores keep the log next to their data
        let log_dir = match &settings.storage.data_dir {
            Some(dir) => dir.clone(),
            None => state_dir()?,
        };
        Ok(Self {
            settings,
            log_path: log_dir.join("rld.log"),
        })
    }
}

/// Catalog selected at startup
#[derive(Clone)]
pub enum DaemonCatalog {
    Http(TracedCatalogAdapter<HttpCatalogAdapter>),
    /// No catalog configured: every collection counts as existing
    NoOp(NoOpCatalogAdapter),
}

impl DaemonCatalog {
    fn from_settings(settings: &rl_core::CatalogConfig) -> Self {
        match &settings.url {
            Some(url) => DaemonCatalog::Http(TracedCatalogAdapter::new(HttpCatalogAdapter::new(
                url.clone(),
                settings.timeout,
            ))),
            None => DaemonCatalog::NoOp(NoOpCatalogAdapter::new()),
        }
    }
}

#[async_trait]
impl CatalogAdapter for DaemonCatalog {
    async fn check_collections_exist(
        &self,
        ids: &[CollectionId],
    ) -> Result<Vec<bool>, CatalogError> {
        match self {
            DaemonCatalog::Http(catalog) => catalog.check_collections_exist(ids).await,
            DaemonCatalog::NoOp(catalog) => catalog.check_collections_exist(ids).await,
        }
    }
}

/// Daemon state during operation
pub struct DaemonState {
    pub config: Config,
    pub store: LocalStore,
    pub service: DaemonService,
    pub gc: DaemonCollector,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Purge compacted prefixes, then fold the journal into a snapshot
    pub async fn run_purge(&self) -> Result<PurgeReport, LifecycleError> {
        let report = self.service.purge().await?;
        self.store.checkpoint()?;
        Ok(report)
    }

    /// Delete collections the catalog no longer knows
    pub async fn run_gc(&self) -> Result<GcReport, LifecycleError> {
        Ok(self.gc.collect().await?)
    }

    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        if let Err(e) = self.store.checkpoint() {
            warn!("Final checkpoint failed: {}", e);
        }

        // Directory lock is released when the last store handle is dropped

        info!(
            data_dir = ?self.config.settings.storage.data_dir,
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Config error: {0}")]
    Config(#[from] rl_core::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] rl_storage::StoreError),

    #[error("Log service error: {0}")]
    Service(#[from] rl_engine::LogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    let settings = &config.settings;

    // 1. Open the store; a durable directory is locked to this process
    let store = match &settings.storage.data_dir {
        Some(dir) => LocalStore::open(dir)?,
        None => {
            warn!("No data_dir configured, ledger lives in memory only");
            LocalStore::in_memory()
        }
    };

    // 2. Compose the service and collector around the same store handle
    let service = LogService::new(store.clone(), SystemClock, &settings.service);
    let catalog = DaemonCatalog::from_settings(&settings.catalog);
    if matches!(catalog, DaemonCatalog::NoOp(_)) {
        info!("No catalog configured, garbage collection will not delete anything");
    }
    let gc = GarbageCollector::new(store.clone(), catalog, &settings.gc);

    info!(
        durable = store.is_durable(),
        purge_interval = ?settings.purge.interval,
        gc_interval = ?settings.gc.interval,
        "Daemon started"
    );

    Ok(DaemonState {
        config: config.clone(),
        store,
        service,
        gc,
        start_time: Instant::now(),
    })
}

/// Get the state directory for rld
fn state_dir() -> Result<PathBuf, LifecycleError> {
    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("record-ledger"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/record-ledger"))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
