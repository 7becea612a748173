// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store wrapper that can hold commits at a barrier and inject failures

use async_trait::async_trait;
use rl_core::{
    CollectionId, CompactionCandidate, FakeClock, Ledger, LogRecord, OffsetSpan, ServiceConfig,
};
use rl_engine::LogService;
use rl_storage::{LocalStore, LocalTransaction, LogStore, StoreError, Transaction};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

pub fn cid(id: &str) -> CollectionId {
    CollectionId::from(id)
}

pub fn payloads(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("m{}", i).into_bytes()).collect()
}

pub fn service<S: LogStore>(store: S) -> LogService<S, FakeClock> {
    LogService::new(store, FakeClock::new(), &ServiceConfig::default())
}

#[derive(Clone)]
pub struct ScriptedStore {
    inner: LocalStore,
    gate: Arc<Barrier>,
    gated_left: Arc<AtomicUsize>,
    broken_deletes: Arc<Mutex<Vec<CollectionId>>>,
}

impl ScriptedStore {
    pub fn new(inner: LocalStore) -> Self {
        Self {
            inner,
            gate: Arc::new(Barrier::new(1)),
            gated_left: Arc::new(AtomicUsize::new(0)),
            broken_deletes: Arc::default(),
        }
    }

    /// Hold the commits of the next `n` transactions until all `n` arrive
    pub fn gate_next(mut self, n: usize) -> Self {
        self.gate = Arc::new(Barrier::new(n));
        self.gated_left = Arc::new(AtomicUsize::new(n));
        self
    }

    /// Make deleting this collection's ledger row fail with an I/O error
    pub fn break_delete(&self, id: &CollectionId) {
        self.broken_deletes.lock().unwrap().push(id.clone());
    }

    pub fn local(&self) -> &LocalStore {
        &self.inner
    }
}

pub struct ScriptedTxn {
    inner: LocalTransaction,
    gate: Option<Arc<Barrier>>,
    broken_deletes: Arc<Mutex<Vec<CollectionId>>>,
}

#[async_trait]
impl LogStore for ScriptedStore {
    type Txn = ScriptedTxn;

    async fn begin(&self) -> Result<ScriptedTxn, StoreError> {
        let gated = self
            .gated_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        Ok(ScriptedTxn {
            inner: self.inner.begin().await?,
            gate: gated.then(|| Arc::clone(&self.gate)),
            broken_deletes: Arc::clone(&self.broken_deletes),
        })
    }

    async fn ledger(&self, id: &CollectionId) -> Result<Option<Ledger>, StoreError> {
        self.inner.ledger(id).await
    }

    async fn scan(
        &self,
        id: &CollectionId,
        from_offset: u64,
        limit: usize,
        end_timestamp: Option<i64>,
    ) -> Result<Vec<LogRecord>, StoreError> {
        self.inner.scan(id, from_offset, limit, end_timestamp).await
    }

    async fn collection_ids(&self) -> Result<Vec<CollectionId>, StoreError> {
        self.inner.collection_ids().await
    }

    async fn compaction_candidates(
        &self,
        min_size: u64,
    ) -> Result<Vec<CompactionCandidate>, StoreError> {
        self.inner.compaction_candidates(min_size).await
    }
}

#[async_trait]
impl Transaction for ScriptedTxn {
    async fn get_ledger(&mut self, id: &CollectionId) -> Result<Option<Ledger>, StoreError> {
        self.inner.get_ledger(id).await
    }

    async fn create_ledger(&mut self, ledger: Ledger) -> Result<(), StoreError> {
        self.inner.create_ledger(ledger).await
    }

    async fn advance_enumeration(
        &mut self,
        id: &CollectionId,
        offset: u64,
    ) -> Result<(), StoreError> {
        self.inner.advance_enumeration(id, offset).await
    }

    async fn advance_compaction(
        &mut self,
        id: &CollectionId,
        offset: u64,
    ) -> Result<(), StoreError> {
        self.inner.advance_compaction(id, offset).await
    }

    async fn seal_ledger(&mut self, id: &CollectionId) -> Result<(), StoreError> {
        self.inner.seal_ledger(id).await
    }

    async fn delete_ledger(&mut self, id: &CollectionId) -> Result<(), StoreError> {
        if self.broken_deletes.lock().unwrap().contains(id) {
            return Err(StoreError::Io(std::io::Error::other("disk on fire")));
        }
        self.inner.delete_ledger(id).await
    }

    async fn insert_records(
        &mut self,
        id: &CollectionId,
        records: Vec<LogRecord>,
    ) -> Result<(), StoreError> {
        self.inner.insert_records(id, records).await
    }

    async fn scan_records(&mut self, id: &CollectionId) -> Result<Vec<LogRecord>, StoreError> {
        self.inner.scan_records(id).await
    }

    async fn record_offset_bounds(
        &mut self,
        id: &CollectionId,
    ) -> Result<Option<OffsetSpan>, StoreError> {
        self.inner.record_offset_bounds(id).await
    }

    async fn delete_records(
        &mut self,
        id: &CollectionId,
        range: RangeInclusive<u64>,
    ) -> Result<u64, StoreError> {
        self.inner.delete_records(id, range).await
    }

    async fn commit(self) -> Result<(), StoreError> {
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        self.inner.commit().await
    }
}
