// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process store with optional on-disk durability
//!
//! Committed state lives in [`MaterializedTables`]. When opened on a
//! directory, every commit is first appended to `journal.jsonl`, and
//! [`LocalStore::checkpoint`] folds the journal into `snapshot.json`.
//! An exclusive lock on `LOCK` keeps a directory to a single process.

use crate::error::StoreError;
use crate::locks::{RowGuard, RowLocks};
use crate::mutation::Mutation;
use crate::snapshot::Snapshot;
use crate::state::MaterializedTables;
use crate::wal::Wal;
use crate::{LogStore, Transaction};
use async_trait::async_trait;
use fs2::FileExt;
use rl_core::{CollectionId, CompactionCandidate, Ledger, LogRecord, OffsetSpan};
use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

const JOURNAL_FILE: &str = "journal.jsonl";
const SNAPSHOT_FILE: &str = "snapshot.json";
const LOCK_FILE: &str = "LOCK";

struct Inner {
    tables: MaterializedTables,
    wal: Option<Wal>,
}

struct Shared {
    inner: Mutex<Inner>,
    locks: RowLocks,
    data_dir: Option<PathBuf>,
    // NOTE(lifetime): held to keep the directory lock; released on drop
    _lock_file: Option<File>,
}

impl Shared {
    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Check constraints, journal, then apply; all or nothing
    fn commit(&self, mutations: &[Mutation]) -> Result<(), StoreError> {
        let mut inner = self.inner();
        inner.tables.check(mutations)?;
        if let Some(wal) = inner.wal.as_mut() {
            wal.append(mutations)?;
        }
        for mutation in mutations {
            inner.tables.apply(mutation);
        }
        Ok(())
    }
}

/// Store handle; clones share the same tables
#[derive(Clone)]
pub struct LocalStore {
    shared: Arc<Shared>,
}

impl LocalStore {
    /// Volatile store, for tests and ephemeral deployments
    pub fn in_memory() -> Self {
        Self::from_parts(MaterializedTables::new(), None, None, None)
    }

    /// Open or create a durable store in `dir`, replaying snapshot and journal
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(dir.join(LOCK_FILE))?;
        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked(dir.to_path_buf()))?;

        let (floor, mut tables) = match Snapshot::load(&dir.join(SNAPSHOT_FILE))? {
            Some(snapshot) => (snapshot.sequence, snapshot.into_tables()),
            None => (0, MaterializedTables::new()),
        };

        let writer_id = uuid::Uuid::new_v4().to_string();
        let (wal, replay) = Wal::open(&dir.join(JOURNAL_FILE), &writer_id, floor)?;

        let mut replayed = 0usize;
        for entry in replay.entries {
            if entry.sequence <= floor {
                continue;
            }
            tables.apply_all(&entry.mutations).map_err(|e| {
                StoreError::Corrupt(format!(
                    "journal entry {} does not apply: {}",
                    entry.sequence, e
                ))
            })?;
            replayed += 1;
        }

        tracing::info!(
            dir = %dir.display(),
            snapshot_sequence = floor,
            replayed,
            collections = tables.ledgers().count(),
            records = tables.record_count(),
            "opened ledger store"
        );

        Ok(Self::from_parts(
            tables,
            Some(wal),
            Some(dir.to_path_buf()),
            Some(lock_file),
        ))
    }

    fn from_parts(
        tables: MaterializedTables,
        wal: Option<Wal>,
        data_dir: Option<PathBuf>,
        lock_file: Option<File>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner { tables, wal }),
                locks: RowLocks::default(),
                data_dir,
                _lock_file: lock_file,
            }),
        }
    }

    pub fn is_durable(&self) -> bool {
        self.shared.data_dir.is_some()
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.shared.data_dir.as_deref()
    }

    /// Write a snapshot of the committed tables and empty the journal.
    /// No-op for in-memory stores.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        let Some(dir) = self.shared.data_dir.as_deref() else {
            return Ok(());
        };
        let mut inner = self.shared.inner();
        let Inner { tables, wal } = &mut *inner;
        let Some(wal) = wal.as_mut() else {
            return Ok(());
        };

        let sequence = wal.last_sequence();
        Snapshot::capture(tables, sequence).write(&dir.join(SNAPSHOT_FILE))?;
        wal.reset()?;

        tracing::debug!(sequence, records = tables.record_count(), "checkpointed store");
        Ok(())
    }

    /// Copy of the committed tables
    pub fn tables(&self) -> MaterializedTables {
        self.shared.inner().tables.clone()
    }
}

#[async_trait]
impl LogStore for LocalStore {
    type Txn = LocalTransaction;

    async fn begin(&self) -> Result<LocalTransaction, StoreError> {
        Ok(LocalTransaction {
            shared: Arc::clone(&self.shared),
            staged: Vec::new(),
            view: HashMap::new(),
            guards: HashMap::new(),
        })
    }

    async fn ledger(&self, id: &CollectionId) -> Result<Option<Ledger>, StoreError> {
        Ok(self.shared.inner().tables.ledger(id).cloned())
    }

    async fn scan(
        &self,
        id: &CollectionId,
        from_offset: u64,
        limit: usize,
        end_timestamp: Option<i64>,
    ) -> Result<Vec<LogRecord>, StoreError> {
        Ok(self
            .shared
            .inner()
            .tables
            .scan(id, from_offset, limit, end_timestamp))
    }

    async fn collection_ids(&self) -> Result<Vec<CollectionId>, StoreError> {
        Ok(self.shared.inner().tables.collection_ids())
    }

    async fn compaction_candidates(
        &self,
        min_size: u64,
    ) -> Result<Vec<CompactionCandidate>, StoreError> {
        Ok(self.shared.inner().tables.compaction_candidates(min_size))
    }
}

/// Transaction against a [`LocalStore`]
pub struct LocalTransaction {
    shared: Arc<Shared>,
    staged: Vec<Mutation>,
    /// Ledger rows as this transaction sees them; `None` marks a known-absent row
    view: HashMap<CollectionId, Option<Ledger>>,
    guards: HashMap<CollectionId, RowGuard>,
}

impl LocalTransaction {
    fn committed_ledger(&self, id: &CollectionId) -> Option<Ledger> {
        self.shared.inner().tables.ledger(id).cloned()
    }

    /// Row that must exist for an update, loaded (and locked) on first touch
    async fn row(&mut self, id: &CollectionId) -> Result<Ledger, StoreError> {
        self.get_ledger(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn stage_row(&mut self, ledger: Ledger, mutation: Mutation) {
        self.view.insert(ledger.collection_id.clone(), Some(ledger));
        self.staged.push(mutation);
    }

    /// Records of `id` as committed, with this transaction's staged writes on top
    fn record_view(&self, id: &CollectionId) -> BTreeMap<u64, LogRecord> {
        let mut by_offset = self
            .shared
            .inner()
            .tables
            .records(id)
            .cloned()
            .unwrap_or_default();

        for mutation in self.staged.iter().filter(|m| m.collection_id() == id) {
            match mutation {
                Mutation::InsertRecords { records, .. } => {
                    for record in records {
                        by_offset.insert(record.offset, record.clone());
                    }
                }
                Mutation::DeleteRecords { first, last, .. } if first <= last => {
                    by_offset.retain(|offset, _| !(*first..=*last).contains(offset));
                }
                _ => {}
            }
        }
        by_offset
    }
}

#[async_trait]
impl Transaction for LocalTransaction {
    async fn get_ledger(&mut self, id: &CollectionId) -> Result<Option<Ledger>, StoreError> {
        if let Some(row) = self.view.get(id) {
            return Ok(row.clone());
        }

        if self.committed_ledger(id).is_none() {
            self.view.insert(id.clone(), None);
            return Ok(None);
        }

        let guard = self.shared.locks.lock(id).await;
        self.guards.insert(id.clone(), guard);

        // Re-read under the lock; the row may have changed while we waited
        let row = self.committed_ledger(id);
        self.view.insert(id.clone(), row.clone());
        Ok(row)
    }

    async fn create_ledger(&mut self, ledger: Ledger) -> Result<(), StoreError> {
        let id = ledger.collection_id.clone();
        ledger
            .check()
            .map_err(|e| StoreError::invariant(&id, e.to_string()))?;

        let exists = match self.view.get(&id) {
            Some(row) => row.is_some(),
            None => self.committed_ledger(&id).is_some(),
        };
        if exists {
            return Err(StoreError::conflict(&id, "ledger row already exists"));
        }

        self.stage_row(ledger.clone(), Mutation::CreateLedger { ledger });
        Ok(())
    }

    async fn advance_enumeration(
        &mut self,
        id: &CollectionId,
        offset: u64,
    ) -> Result<(), StoreError> {
        let mut ledger = self.row(id).await?;
        if offset < ledger.enumeration_offset {
            return Err(StoreError::invariant(
                id,
                format!(
                    "enumeration offset cannot move back from {} to {}",
                    ledger.enumeration_offset, offset
                ),
            ));
        }
        ledger.enumeration_offset = offset;
        self.stage_row(
            ledger,
            Mutation::AdvanceEnumeration {
                collection_id: id.clone(),
                offset,
            },
        );
        Ok(())
    }

    async fn advance_compaction(
        &mut self,
        id: &CollectionId,
        offset: u64,
    ) -> Result<(), StoreError> {
        let mut ledger = self.row(id).await?;
        if offset < ledger.compaction_offset || offset > ledger.enumeration_offset {
            return Err(StoreError::invariant(
                id,
                format!(
                    "compaction offset {} outside [{}, {}]",
                    offset, ledger.compaction_offset, ledger.enumeration_offset
                ),
            ));
        }
        ledger.compaction_offset = offset;
        self.stage_row(
            ledger,
            Mutation::AdvanceCompaction {
                collection_id: id.clone(),
                offset,
            },
        );
        Ok(())
    }

    async fn seal_ledger(&mut self, id: &CollectionId) -> Result<(), StoreError> {
        let mut ledger = self.row(id).await?;
        if ledger.is_sealed {
            return Ok(());
        }
        ledger.is_sealed = true;
        self.stage_row(
            ledger,
            Mutation::Seal {
                collection_id: id.clone(),
            },
        );
        Ok(())
    }

    async fn delete_ledger(&mut self, id: &CollectionId) -> Result<(), StoreError> {
        self.row(id).await?;
        self.view.insert(id.clone(), None);
        self.staged.push(Mutation::DeleteLedger {
            collection_id: id.clone(),
        });
        Ok(())
    }

    async fn insert_records(
        &mut self,
        id: &CollectionId,
        records: Vec<LogRecord>,
    ) -> Result<(), StoreError> {
        if let Some(stray) = records.iter().find(|r| r.collection_id != *id) {
            return Err(StoreError::invariant(
                id,
                format!("record belongs to {}", stray.collection_id),
            ));
        }
        if records.is_empty() {
            return Ok(());
        }
        self.staged.push(Mutation::InsertRecords {
            collection_id: id.clone(),
            records,
        });
        Ok(())
    }

    async fn scan_records(&mut self, id: &CollectionId) -> Result<Vec<LogRecord>, StoreError> {
        Ok(self.record_view(id).into_values().collect())
    }

    async fn record_offset_bounds(
        &mut self,
        id: &CollectionId,
    ) -> Result<Option<OffsetSpan>, StoreError> {
        let by_offset = self.record_view(id);
        Ok(match (by_offset.keys().next(), by_offset.keys().next_back()) {
            (Some(min), Some(max)) => Some(OffsetSpan::new(*min, *max)),
            _ => None,
        })
    }

    async fn delete_records(
        &mut self,
        id: &CollectionId,
        range: RangeInclusive<u64>,
    ) -> Result<u64, StoreError> {
        let removed = self.record_view(id).range(range.clone()).count() as u64;
        if removed > 0 {
            self.staged.push(Mutation::DeleteRecords {
                collection_id: id.clone(),
                first: *range.start(),
                last: *range.end(),
            });
        }
        Ok(removed)
    }

    async fn commit(self) -> Result<(), StoreError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        self.shared.commit(&self.staged)?;

        let LocalTransaction {
            shared,
            staged,
            guards,
            ..
        } = self;
        drop(guards);
        for mutation in &staged {
            if let Mutation::DeleteLedger { collection_id } = mutation {
                shared.locks.forget(collection_id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
