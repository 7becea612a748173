// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log records and compaction candidates

use crate::id::CollectionId;
use serde::{Deserialize, Serialize};

/// One appended mutation
///
/// Records are immutable once written. The payload is opaque to the log
/// store; only the compactor downstream interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub collection_id: CollectionId,
    /// Unique within `collection_id`, contiguous from 1
    pub offset: u64,
    /// Insertion wall time in nanoseconds since the Unix epoch
    pub timestamp_nanos: i64,
    pub payload: Vec<u8>,
}

impl LogRecord {
    pub fn new(
        collection_id: CollectionId,
        offset: u64,
        timestamp_nanos: i64,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            collection_id,
            offset,
            timestamp_nanos,
            payload: payload.into(),
        }
    }

    /// Same record re-homed under another collection, keeping offset and time
    pub fn with_collection(&self, collection_id: CollectionId) -> Self {
        Self {
            collection_id,
            ..self.clone()
        }
    }
}

/// Lowest and highest offsets of the records a collection currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetSpan {
    pub min: u64,
    pub max: u64,
}

impl OffsetSpan {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Split the span into consecutive inclusive ranges of at most `batch` offsets
    pub fn chunks(&self, batch: u64) -> Vec<std::ops::RangeInclusive<u64>> {
        let batch = batch.max(1);
        let mut ranges = Vec::new();
        let mut start = self.min;
        while start <= self.max {
            let end = start.saturating_add(batch - 1).min(self.max);
            ranges.push(start..=end);
            if end == u64::MAX {
                break;
            }
            start = end + 1;
        }
        ranges
    }
}

/// A collection with uncompacted records waiting for the compactor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionCandidate {
    pub collection_id: CollectionId,
    /// Lowest uncompacted offset still present
    pub next_offset: u64,
    /// Timestamp of the record at `next_offset`
    pub oldest_timestamp_nanos: i64,
}

/// Order candidates oldest first; ties broken by collection id
pub fn sort_candidates(candidates: &mut [CompactionCandidate]) {
    candidates.sort_by(|a, b| {
        a.oldest_timestamp_nanos
            .cmp(&b.oldest_timestamp_nanos)
            .then_with(|| a.collection_id.cmp(&b.collection_id))
    });
}
