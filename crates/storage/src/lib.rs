// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Transactional backing store for the record ledger
//!
//! The log service delegates ordering, uniqueness and atomicity to this
//! layer. A [`LogStore`] hands out [`Transaction`]s that lock ledger rows
//! for update, stage writes, and apply them all-or-nothing at commit under
//! two unique constraints: one ledger row per collection, and one record per
//! `(collection_id, offset)`.

mod error;
mod local;
mod locks;
mod mutation;
mod snapshot;
mod state;
mod wal;

pub use error::StoreError;
pub use local::{LocalStore, LocalTransaction};
pub use mutation::Mutation;
pub use snapshot::Snapshot;
pub use state::MaterializedTables;
pub use wal::{Replay, Wal, WalEntry};

use async_trait::async_trait;
use rl_core::{CollectionId, CompactionCandidate, Ledger, LogRecord, OffsetSpan};
use std::ops::RangeInclusive;

/// A transactional store of ledger rows and records
#[async_trait]
pub trait LogStore: Clone + Send + Sync + 'static {
    type Txn: Transaction;

    /// Start a transaction
    async fn begin(&self) -> Result<Self::Txn, StoreError>;

    /// Committed ledger row, read without locking
    async fn ledger(&self, id: &CollectionId) -> Result<Option<Ledger>, StoreError>;

    /// Up to `limit` committed records with `offset >= from_offset` in offset
    /// order, optionally restricted to `timestamp <= end_timestamp`. Lock-free.
    async fn scan(
        &self,
        id: &CollectionId,
        from_offset: u64,
        limit: usize,
        end_timestamp: Option<i64>,
    ) -> Result<Vec<LogRecord>, StoreError>;

    /// Every collection with a ledger row, regardless of record count
    async fn collection_ids(&self) -> Result<Vec<CollectionId>, StoreError>;

    /// Collections with at least `max(min_size, 1)` uncompacted records, oldest first
    async fn compaction_candidates(
        &self,
        min_size: u64,
    ) -> Result<Vec<CompactionCandidate>, StoreError>;
}

/// One atomic unit of work.
///
/// Writes are staged and become visible together at [`commit`](Self::commit).
/// Dropping a transaction without committing rolls it back and releases its
/// row locks.
#[async_trait]
pub trait Transaction: Send {
    /// Read a ledger row for update, locking it until the transaction ends.
    /// Absent rows are not locked.
    async fn get_ledger(&mut self, id: &CollectionId) -> Result<Option<Ledger>, StoreError>;

    /// Insert a new ledger row; an existing row is a [`StoreError::Conflict`]
    async fn create_ledger(&mut self, ledger: Ledger) -> Result<(), StoreError>;

    /// Move the write frontier forward
    async fn advance_enumeration(&mut self, id: &CollectionId, offset: u64)
        -> Result<(), StoreError>;

    /// Move the safe-to-purge frontier forward, never past the write frontier
    async fn advance_compaction(&mut self, id: &CollectionId, offset: u64)
        -> Result<(), StoreError>;

    /// Refuse further appends
    async fn seal_ledger(&mut self, id: &CollectionId) -> Result<(), StoreError>;

    async fn delete_ledger(&mut self, id: &CollectionId) -> Result<(), StoreError>;

    /// Batched insert; a duplicate `(collection_id, offset)` is a [`StoreError::Conflict`]
    async fn insert_records(
        &mut self,
        id: &CollectionId,
        records: Vec<LogRecord>,
    ) -> Result<(), StoreError>;

    /// All records the collection currently holds, as seen by this transaction
    async fn scan_records(&mut self, id: &CollectionId) -> Result<Vec<LogRecord>, StoreError>;

    /// Lowest and highest record offsets held, `None` when there are no records
    async fn record_offset_bounds(
        &mut self,
        id: &CollectionId,
    ) -> Result<Option<OffsetSpan>, StoreError>;

    /// Delete records within `range`, returning how many were removed
    async fn delete_records(
        &mut self,
        id: &CollectionId,
        range: RangeInclusive<u64>,
    ) -> Result<u64, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}
