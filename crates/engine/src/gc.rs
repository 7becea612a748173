// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Garbage collection of collections the catalog no longer knows
//!
//! Two phases: ask the catalog about every ledger id in batches and select
//! the absent ones, then delete each selected collection in its own
//! transaction. Nothing is deleted unless the whole selection succeeded.

use crate::error::LogError;
use rl_adapters::{CatalogAdapter, CatalogError};
use rl_core::{catalog_batches, select_for_deletion, CollectionId, GcConfig};
use rl_storage::{LogStore, Transaction};
use serde::Serialize;

/// Summary of one collection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GcReport {
    /// Ledger ids checked against the catalog
    pub scanned: usize,
    /// Collections removed with all their records
    pub deleted: usize,
    /// Collections selected for deletion whose removal failed
    pub failed: usize,
}

/// Removes ledger rows and records of collections absent from the catalog
#[derive(Clone)]
pub struct GarbageCollector<S, Cat> {
    store: S,
    catalog: Cat,
    catalog_batch_size: usize,
    delete_batch_size: u64,
}

impl<S: LogStore, Cat: CatalogAdapter> GarbageCollector<S, Cat> {
    pub fn new(store: S, catalog: Cat, config: &GcConfig) -> Self {
        Self {
            store,
            catalog,
            catalog_batch_size: config.catalog_batch_size.max(1),
            delete_batch_size: config.delete_batch_size.max(1),
        }
    }

    /// Run one full pass
    pub async fn collect(&self) -> Result<GcReport, LogError> {
        let ids = self.store.collection_ids().await?;
        let doomed = self.select(&ids).await?;

        let mut report = GcReport {
            scanned: ids.len(),
            ..GcReport::default()
        };
        for id in &doomed {
            match self.delete_collection(id).await {
                Ok(true) => report.deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(collection_id = %id, error = %e, "gc delete failed, skipping");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            deleted = report.deleted,
            failed = report.failed,
            "gc pass complete"
        );
        Ok(report)
    }

    /// Ids the catalog reports as absent; any catalog failure aborts the pass
    async fn select(&self, ids: &[CollectionId]) -> Result<Vec<CollectionId>, LogError> {
        let mut doomed = Vec::new();
        for batch in catalog_batches(ids, self.catalog_batch_size) {
            let exists = self.catalog.check_collections_exist(batch).await?;
            let absent = select_for_deletion(batch, &exists)
                .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
            doomed.extend(absent);
        }
        Ok(doomed)
    }

    /// Remove one collection. Returns false if it was already gone.
    async fn delete_collection(&self, id: &CollectionId) -> Result<bool, LogError> {
        let mut txn = self.store.begin().await?;
        if txn.get_ledger(id).await?.is_none() {
            return Ok(false);
        }

        let mut removed = 0u64;
        if let Some(span) = txn.record_offset_bounds(id).await? {
            for range in span.chunks(self.delete_batch_size) {
                removed += txn.delete_records(id, range).await?;
            }
        }
        txn.delete_ledger(id).await?;
        txn.commit().await?;

        tracing::info!(collection_id = %id, records = removed, "deleted collection");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "gc_tests.rs"]
mod tests;
