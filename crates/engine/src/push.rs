// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append path

use crate::error::LogError;
use crate::service::LogService;
use rl_core::{Clock, CollectionId, Ledger, LogRecord};
use rl_storage::{LogStore, Transaction};
use serde::Serialize;

/// Outcome of a push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PushResult {
    /// Records appended; zero when the collection is sealed
    pub inserted: u64,
    pub is_sealed: bool,
}

impl<S: LogStore, C: Clock> LogService<S, C> {
    /// Append `payloads` to a collection's log at the next contiguous offsets.
    ///
    /// The first push creates the ledger row. Two pushes racing to create it
    /// both proceed; the loser fails with a retryable [`LogError::Conflict`] at
    /// commit. A sealed collection accepts nothing and reports it.
    pub async fn push(
        &self,
        id: &CollectionId,
        payloads: Vec<Vec<u8>>,
    ) -> Result<PushResult, LogError> {
        let mut txn = self.store.begin().await?;

        let existing = txn.get_ledger(id).await?;
        if existing.as_ref().is_some_and(|ledger| ledger.is_sealed) {
            tracing::debug!(collection_id = %id, "push to sealed collection");
            return Ok(PushResult {
                inserted: 0,
                is_sealed: true,
            });
        }
        if payloads.is_empty() {
            return Ok(PushResult {
                inserted: 0,
                is_sealed: false,
            });
        }

        let ledger = match existing {
            Some(ledger) => ledger,
            None => {
                let ledger = Ledger::new(id.clone());
                txn.create_ledger(ledger.clone()).await?;
                ledger
            }
        };

        let count = payloads.len() as u64;
        let offsets = ledger.next_offsets(count);
        let last = *offsets.end();
        let timestamp = self.clock.now_nanos();
        let records: Vec<LogRecord> = offsets
            .zip(payloads)
            .map(|(offset, payload)| LogRecord::new(id.clone(), offset, timestamp, payload))
            .collect();

        txn.insert_records(id, records).await?;
        txn.advance_enumeration(id, last).await?;
        txn.commit().await?;

        if ledger.enumeration_offset == 0 {
            tracing::info!(collection_id = %id, "created ledger");
        }
        tracing::debug!(collection_id = %id, count, enumeration_offset = last, "pushed");

        Ok(PushResult {
            inserted: count,
            is_sealed: false,
        })
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
