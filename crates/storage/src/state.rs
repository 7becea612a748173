// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized ledger and record tables
//!
//! The committed state of the store. Built by replaying the snapshot and
//! journal, and advanced one committed transaction at a time.

use crate::error::StoreError;
use crate::mutation::Mutation;
use rl_core::{sort_candidates, CollectionId, CompactionCandidate, Ledger, LogRecord, OffsetSpan};
use std::collections::{BTreeMap, HashMap};

/// Committed ledger rows and records
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MaterializedTables {
    ledgers: BTreeMap<CollectionId, Ledger>,
    records: BTreeMap<CollectionId, BTreeMap<u64, LogRecord>>,
}

impl MaterializedTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild tables from snapshot contents
    pub fn from_parts(ledgers: Vec<Ledger>, records: Vec<LogRecord>) -> Self {
        let mut tables = Self::new();
        for ledger in ledgers {
            tables.ledgers.insert(ledger.collection_id.clone(), ledger);
        }
        for record in records {
            tables
                .records
                .entry(record.collection_id.clone())
                .or_default()
                .insert(record.offset, record);
        }
        tables
    }

    pub fn ledger(&self, id: &CollectionId) -> Option<&Ledger> {
        self.ledgers.get(id)
    }

    pub fn ledgers(&self) -> impl Iterator<Item = &Ledger> {
        self.ledgers.values()
    }

    pub fn collection_ids(&self) -> Vec<CollectionId> {
        self.ledgers.keys().cloned().collect()
    }

    /// Records currently held for a collection, keyed by offset
    pub fn records(&self, id: &CollectionId) -> Option<&BTreeMap<u64, LogRecord>> {
        self.records.get(id)
    }

    pub fn all_records(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.values().flat_map(|by_offset| by_offset.values())
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    pub fn has_record(&self, id: &CollectionId, offset: u64) -> bool {
        self.records
            .get(id)
            .is_some_and(|by_offset| by_offset.contains_key(&offset))
    }

    pub fn offset_span(&self, id: &CollectionId) -> Option<OffsetSpan> {
        let by_offset = self.records.get(id)?;
        let min = *by_offset.keys().next()?;
        let max = *by_offset.keys().next_back()?;
        Some(OffsetSpan::new(min, max))
    }

    /// Up to `limit` records with `offset >= from_offset`, ascending, optionally
    /// restricted to `timestamp <= end_timestamp`
    pub fn scan(
        &self,
        id: &CollectionId,
        from_offset: u64,
        limit: usize,
        end_timestamp: Option<i64>,
    ) -> Vec<LogRecord> {
        let Some(by_offset) = self.records.get(id) else {
            return Vec::new();
        };
        by_offset
            .range(from_offset..)
            .map(|(_, record)| record)
            .filter(|record| end_timestamp.map_or(true, |end| record.timestamp_nanos <= end))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Collections holding at least `max(min_size, 1)` uncompacted records
    pub fn compaction_candidates(&self, min_size: u64) -> Vec<CompactionCandidate> {
        let min_size = min_size.max(1);
        let mut candidates: Vec<CompactionCandidate> = self
            .ledgers
            .values()
            .filter_map(|ledger| {
                let by_offset = self.records.get(&ledger.collection_id)?;
                let mut pending = by_offset.range(ledger.compaction_offset.saturating_add(1)..);
                let (_, oldest) = pending.next()?;
                let count = 1 + pending.count() as u64;
                (count >= min_size).then(|| CompactionCandidate {
                    collection_id: ledger.collection_id.clone(),
                    next_offset: oldest.offset,
                    oldest_timestamp_nanos: oldest.timestamp_nanos,
                })
            })
            .collect();
        sort_candidates(&mut candidates);
        candidates
    }

    /// Enforce primary-key and unique constraints for a batch of mutations
    /// as if they were applied in order on top of the current tables.
    pub fn check(&self, mutations: &[Mutation]) -> Result<(), StoreError> {
        let mut rows: HashMap<&CollectionId, bool> = HashMap::new();
        let mut keys: HashMap<(&CollectionId, u64), bool> = HashMap::new();

        for mutation in mutations {
            match mutation {
                Mutation::CreateLedger { ledger } => {
                    let id = &ledger.collection_id;
                    if self.row_exists(&rows, id) {
                        return Err(StoreError::conflict(id, "ledger row already exists"));
                    }
                    rows.insert(id, true);
                }
                Mutation::AdvanceEnumeration { collection_id, .. }
                | Mutation::AdvanceCompaction { collection_id, .. }
                | Mutation::Seal { collection_id } => {
                    if !self.row_exists(&rows, collection_id) {
                        return Err(StoreError::NotFound(collection_id.clone()));
                    }
                }
                Mutation::DeleteLedger { collection_id } => {
                    if !self.row_exists(&rows, collection_id) {
                        return Err(StoreError::NotFound(collection_id.clone()));
                    }
                    rows.insert(collection_id, false);
                }
                Mutation::InsertRecords {
                    collection_id,
                    records,
                } => {
                    for record in records {
                        if record.collection_id != *collection_id {
                            return Err(StoreError::invariant(
                                collection_id,
                                format!("record belongs to {}", record.collection_id),
                            ));
                        }
                        let exists = keys
                            .get(&(collection_id, record.offset))
                            .copied()
                            .unwrap_or_else(|| self.has_record(collection_id, record.offset));
                        if exists {
                            return Err(StoreError::conflict(
                                collection_id,
                                format!("record offset {} already exists", record.offset),
                            ));
                        }
                        keys.insert((collection_id, record.offset), true);
                    }
                }
                Mutation::DeleteRecords {
                    collection_id,
                    first,
                    last,
                } => {
                    if first > last {
                        continue;
                    }
                    if let Some(by_offset) = self.records.get(collection_id) {
                        for offset in by_offset.range(*first..=*last).map(|(o, _)| *o) {
                            keys.insert((collection_id, offset), false);
                        }
                    }
                    for ((id, offset), present) in keys.iter_mut() {
                        if *id == collection_id && (*first..=*last).contains(offset) {
                            *present = false;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn row_exists(&self, overlay: &HashMap<&CollectionId, bool>, id: &CollectionId) -> bool {
        overlay
            .get(id)
            .copied()
            .unwrap_or_else(|| self.ledgers.contains_key(id))
    }

    /// Apply a mutation that has already passed [`check`](Self::check)
    pub fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::CreateLedger { ledger } => {
                self.ledgers
                    .insert(ledger.collection_id.clone(), ledger.clone());
            }
            Mutation::AdvanceEnumeration {
                collection_id,
                offset,
            } => {
                if let Some(ledger) = self.ledgers.get_mut(collection_id) {
                    ledger.enumeration_offset = *offset;
                }
            }
            Mutation::AdvanceCompaction {
                collection_id,
                offset,
            } => {
                if let Some(ledger) = self.ledgers.get_mut(collection_id) {
                    ledger.compaction_offset = *offset;
                }
            }
            Mutation::Seal { collection_id } => {
                if let Some(ledger) = self.ledgers.get_mut(collection_id) {
                    ledger.is_sealed = true;
                }
            }
            Mutation::DeleteLedger { collection_id } => {
                self.ledgers.remove(collection_id);
            }
            Mutation::InsertRecords {
                collection_id,
                records,
            } => {
                let by_offset = self.records.entry(collection_id.clone()).or_default();
                for record in records {
                    by_offset.insert(record.offset, record.clone());
                }
            }
            Mutation::DeleteRecords {
                collection_id,
                first,
                last,
            } => {
                if first > last {
                    return;
                }
                if let Some(by_offset) = self.records.get_mut(collection_id) {
                    let doomed: Vec<u64> =
                        by_offset.range(*first..=*last).map(|(o, _)| *o).collect();
                    for offset in doomed {
                        by_offset.remove(&offset);
                    }
                    if by_offset.is_empty() {
                        self.records.remove(collection_id);
                    }
                }
            }
        }
    }

    /// Check then apply a whole transaction; nothing is applied on error
    pub fn apply_all(&mut self, mutations: &[Mutation]) -> Result<(), StoreError> {
        self.check(mutations)?;
        for mutation in mutations {
            self.apply(mutation);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
