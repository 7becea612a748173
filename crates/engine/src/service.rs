// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The log service and its smaller operations
//!
//! Each write runs in one store transaction with the ledger row locked for
//! the duration. The service keeps no locks or caches of its own, so any
//! number of instances can share one store.

use crate::error::LogError;
use rl_core::{Bounds, Clock, CollectionId, CompactionCandidate, Ledger, ServiceConfig};
use rl_storage::{LogStore, Transaction};

/// Per-collection write-ahead log over a transactional store
#[derive(Clone)]
pub struct LogService<S, C> {
    pub(crate) store: S,
    pub(crate) clock: C,
    pub(crate) max_pull_batch: usize,
}

impl<S: LogStore, C: Clock> LogService<S, C> {
    pub fn new(store: S, clock: C, config: &ServiceConfig) -> Self {
        Self {
            store,
            clock,
            max_pull_batch: config.max_pull_batch.max(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current `(compaction_offset, enumeration_offset)` of a collection
    pub async fn get_bounds(&self, id: &CollectionId) -> Result<Bounds, LogError> {
        self.store
            .ledger(id)
            .await?
            .map(|ledger| ledger.bounds())
            .ok_or_else(|| LogError::NotFound(id.clone()))
    }

    /// Stop further appends. Creates the row sealed if the collection never
    /// received a write. Sealing twice is harmless.
    pub async fn seal(&self, id: &CollectionId) -> Result<(), LogError> {
        let mut txn = self.store.begin().await?;
        match txn.get_ledger(id).await? {
            Some(ledger) if ledger.is_sealed => return Ok(()),
            Some(_) => txn.seal_ledger(id).await?,
            None => txn.create_ledger(Ledger::sealed(id.clone())).await?,
        }
        txn.commit().await?;

        tracing::info!(collection_id = %id, "sealed collection");
        Ok(())
    }

    /// Record that the compactor has absorbed everything through `offset`
    pub async fn advance_compaction_offset(
        &self,
        id: &CollectionId,
        offset: u64,
    ) -> Result<(), LogError> {
        let mut txn = self.store.begin().await?;
        let ledger = txn
            .get_ledger(id)
            .await?
            .ok_or_else(|| LogError::NotFound(id.clone()))?;

        if offset > ledger.enumeration_offset {
            return Err(LogError::InvalidArgument(format!(
                "compaction offset {} is past enumeration offset {} of {}",
                offset, ledger.enumeration_offset, id
            )));
        }
        if offset < ledger.compaction_offset {
            return Err(LogError::InvalidArgument(format!(
                "compaction offset of {} cannot move back from {} to {}",
                id, ledger.compaction_offset, offset
            )));
        }
        if offset == ledger.compaction_offset {
            return Ok(());
        }

        txn.advance_compaction(id, offset).await?;
        txn.commit().await?;

        tracing::debug!(collection_id = %id, offset, "advanced compaction offset");
        Ok(())
    }

    /// Collections with at least `max(min_size, 1)` uncompacted records, oldest first
    pub async fn collections_to_compact(
        &self,
        min_size: u64,
    ) -> Result<Vec<CompactionCandidate>, LogError> {
        Ok(self.store.compaction_candidates(min_size).await?)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
