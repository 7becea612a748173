// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row-level locks on ledger rows
//!
//! The equivalent of `SELECT ... FOR UPDATE`: a transaction that reads a
//! ledger row for update holds that row until it commits or is dropped.
//! Rows that do not exist are never locked, so two creators race and the
//! loser hits the primary-key constraint at commit.

use rl_core::CollectionId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// Held row lock; released on drop
pub type RowGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct RowLocks {
    rows: Mutex<HashMap<CollectionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl RowLocks {
    /// Wait for exclusive access to a row
    pub async fn lock(&self, id: &CollectionId) -> RowGuard {
        let row = {
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.entry(id.clone()).or_default().clone()
        };
        row.lock_owned().await
    }

    /// Drop the lock entry of a deleted row once nobody holds or waits on it
    pub fn forget(&self, id: &CollectionId) {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        if rows.get(id).is_some_and(|row| Arc::strong_count(row) == 1) {
            rows.remove(id);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
