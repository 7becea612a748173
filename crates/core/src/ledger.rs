// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-collection offset ledger row
//!
//! One row per collection known to the log store. The row records the write
//! frontier (enumeration offset), the safe-to-purge frontier (compaction
//! offset) and whether further appends are refused.

use crate::id::CollectionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broken ledger invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerViolation {
    #[error("compaction offset {compaction} is ahead of enumeration offset {enumeration}")]
    CompactionAheadOfEnumeration { compaction: u64, enumeration: u64 },
}

/// Offset window of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Records at or below this offset may already be purged
    pub compaction_offset: u64,
    /// Offset of the most recently appended record (0 when none)
    pub enumeration_offset: u64,
}

impl Bounds {
    pub fn new(compaction_offset: u64, enumeration_offset: u64) -> Self {
        Self {
            compaction_offset,
            enumeration_offset,
        }
    }

    /// Number of records that have not been compacted yet
    pub fn uncompacted(&self) -> u64 {
        self.enumeration_offset.saturating_sub(self.compaction_offset)
    }

    pub fn check(&self) -> Result<(), LedgerViolation> {
        if self.compaction_offset > self.enumeration_offset {
            return Err(LedgerViolation::CompactionAheadOfEnumeration {
                compaction: self.compaction_offset,
                enumeration: self.enumeration_offset,
            });
        }
        Ok(())
    }
}

/// Ledger row for one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub collection_id: CollectionId,
    pub enumeration_offset: u64,
    pub compaction_offset: u64,
    pub is_sealed: bool,
}

impl Ledger {
    /// Fresh row as created by the first append
    pub fn new(collection_id: CollectionId) -> Self {
        Self {
            collection_id,
            enumeration_offset: 0,
            compaction_offset: 0,
            is_sealed: false,
        }
    }

    /// Row created directly in the sealed state
    pub fn sealed(collection_id: CollectionId) -> Self {
        Self {
            is_sealed: true,
            ..Self::new(collection_id)
        }
    }

    /// Row with explicit bounds, as created by a fork
    pub fn with_bounds(collection_id: CollectionId, bounds: Bounds) -> Self {
        Self {
            collection_id,
            enumeration_offset: bounds.enumeration_offset,
            compaction_offset: bounds.compaction_offset,
            is_sealed: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.compaction_offset, self.enumeration_offset)
    }

    /// Offsets the next append of `count` records would receive
    pub fn next_offsets(&self, count: u64) -> std::ops::RangeInclusive<u64> {
        (self.enumeration_offset + 1)..=(self.enumeration_offset + count)
    }

    /// Verify `0 <= compaction_offset <= enumeration_offset`
    pub fn check(&self) -> Result<(), LedgerViolation> {
        self.bounds().check()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
