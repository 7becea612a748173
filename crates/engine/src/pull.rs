// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read path

use crate::error::LogError;
use crate::service::LogService;
use rl_core::{Clock, CollectionId, LogRecord};
use rl_storage::LogStore;

impl<S: LogStore, C: Clock> LogService<S, C> {
    /// Read up to `batch_size` records starting exactly at `from_offset`.
    ///
    /// Takes no locks. A purge may run concurrently, so a gap at the front of
    /// the result, or an empty result at or below the compaction offset, is
    /// reported as [`LogError::Purged`] rather than returned as data. Offsets
    /// start at 1, so offset 0 always reads as purged.
    pub async fn pull(
        &self,
        id: &CollectionId,
        from_offset: u64,
        batch_size: usize,
        end_timestamp: Option<i64>,
    ) -> Result<Vec<LogRecord>, LogError> {
        if batch_size == 0 {
            return Err(LogError::InvalidArgument("batch size must be positive".to_string()));
        }

        let limit = batch_size.min(self.max_pull_batch);
        let records = self.store.scan(id, from_offset, limit, end_timestamp).await?;

        match records.first() {
            Some(first) if first.offset != from_offset => Err(self.purged(id, from_offset).await),
            Some(_) => {
                tracing::debug!(collection_id = %id, from_offset, count = records.len(), "pulled");
                Ok(records)
            }
            None => {
                let compaction_offset = self.compaction_offset(id).await?;
                if from_offset <= compaction_offset {
                    Err(self.purged(id, from_offset).await)
                } else {
                    Ok(records)
                }
            }
        }
    }

    /// Committed compaction offset; a collection without a row counts as 0
    async fn compaction_offset(&self, id: &CollectionId) -> Result<u64, LogError> {
        Ok(self
            .store
            .ledger(id)
            .await?
            .map(|ledger| ledger.compaction_offset)
            .unwrap_or(0))
    }

    async fn purged(&self, id: &CollectionId, from_offset: u64) -> LogError {
        let compaction_offset = match self.compaction_offset(id).await {
            Ok(offset) => offset,
            Err(e) => return e,
        };
        tracing::warn!(
            collection_id = %id,
            from_offset,
            compaction_offset,
            "pull from purged offset"
        );
        LogError::Purged {
            collection_id: id.clone(),
            from_offset,
            compaction_offset,
        }
    }
}

#[cfg(test)]
#[path = "pull_tests.rs"]
mod tests;
