// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fork path

use crate::error::LogError;
use crate::service::LogService;
use rl_core::{derive_fork_bounds, Bounds, Clock, CollectionId, Ledger, LogRecord, OffsetSpan};
use rl_storage::{LogStore, Transaction};

impl<S: LogStore, C: Clock> LogService<S, C> {
    /// Clone a collection's log into a new collection id, keeping offsets and
    /// timestamps. Returns the target's bounds. The target starts unsealed.
    pub async fn fork(
        &self,
        source: &CollectionId,
        target: &CollectionId,
    ) -> Result<Bounds, LogError> {
        if source == target {
            return Err(LogError::InvalidArgument(format!("cannot fork {} into itself", source)));
        }

        let mut txn = self.store.begin().await?;
        let origin = txn
            .get_ledger(source)
            .await?
            .ok_or_else(|| LogError::NotFound(source.clone()))?;
        if txn.get_ledger(target).await?.is_some() {
            return Err(LogError::Conflict {
                collection_id: target.clone(),
                detail: "fork target already exists".to_string(),
            });
        }

        let copies: Vec<LogRecord> = txn
            .scan_records(source)
            .await?
            .iter()
            .map(|record| record.with_collection(target.clone()))
            .collect();
        let copied = match (copies.first(), copies.last()) {
            (Some(first), Some(last)) => Some(OffsetSpan::new(first.offset, last.offset)),
            _ => None,
        };

        let bounds = derive_fork_bounds(origin.bounds(), copied);
        let count = copies.len();
        txn.create_ledger(Ledger::with_bounds(target.clone(), bounds)).await?;
        txn.insert_records(target, copies).await?;
        txn.commit().await?;

        tracing::info!(
            source = %source,
            target = %target,
            copied = count,
            compaction_offset = bounds.compaction_offset,
            enumeration_offset = bounds.enumeration_offset,
            "forked collection"
        );
        Ok(bounds)
    }
}

#[cfg(test)]
#[path = "fork_tests.rs"]
mod tests;
