// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reclamation of compacted prefixes

use crate::error::LogError;
use crate::service::LogService;
use rl_core::{Clock, CollectionId};
use rl_storage::{LogStore, Transaction};
use serde::Serialize;

/// Summary of one purge sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    /// Collections examined
    pub scanned: usize,
    /// Records removed across all collections
    pub purged: u64,
    /// Collections whose purge failed and was skipped
    pub failed: usize,
}

impl<S: LogStore, C: Clock> LogService<S, C> {
    /// Delete every record at or below its collection's compaction offset.
    ///
    /// Each collection is purged in its own transaction. A failure on one is
    /// logged and skipped.
    pub async fn purge(&self) -> Result<PurgeReport, LogError> {
        let ids = self.store.collection_ids().await?;
        let mut report = PurgeReport {
            scanned: ids.len(),
            ..PurgeReport::default()
        };

        for id in &ids {
            match self.purge_collection(id).await {
                Ok(removed) => report.purged += removed,
                Err(e) => {
                    tracing::warn!(collection_id = %id, error = %e, "purge failed, skipping");
                    report.failed += 1;
                }
            }
        }

        if report.purged > 0 || report.failed > 0 {
            tracing::info!(
                scanned = report.scanned,
                purged = report.purged,
                failed = report.failed,
                "purge complete"
            );
        }
        Ok(report)
    }

    async fn purge_collection(&self, id: &CollectionId) -> Result<u64, LogError> {
        let mut txn = self.store.begin().await?;
        let Some(ledger) = txn.get_ledger(id).await? else {
            return Ok(0);
        };
        let Some(span) = txn.record_offset_bounds(id).await? else {
            return Ok(0);
        };
        if span.min > ledger.compaction_offset {
            return Ok(0);
        }

        let removed = txn
            .delete_records(id, span.min..=ledger.compaction_offset)
            .await?;
        txn.commit().await?;

        tracing::debug!(
            collection_id = %id,
            removed,
            compaction_offset = ledger.compaction_offset,
            "purged compacted records"
        );
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "purge_tests.rs"]
mod tests;
