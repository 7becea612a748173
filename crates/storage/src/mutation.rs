// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staged writes of a transaction
//!
//! A transaction collects mutations and the store applies them all at
//! commit. The same values are what the write-ahead journal persists.

use rl_core::{CollectionId, Ledger, LogRecord};
use serde::{Deserialize, Serialize};

/// A single write against the ledger or record tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    CreateLedger {
        ledger: Ledger,
    },
    AdvanceEnumeration {
        collection_id: CollectionId,
        offset: u64,
    },
    AdvanceCompaction {
        collection_id: CollectionId,
        offset: u64,
    },
    Seal {
        collection_id: CollectionId,
    },
    DeleteLedger {
        collection_id: CollectionId,
    },
    InsertRecords {
        collection_id: CollectionId,
        records: Vec<LogRecord>,
    },
    /// Remove records with `first <= offset <= last`
    DeleteRecords {
        collection_id: CollectionId,
        first: u64,
        last: u64,
    },
}

impl Mutation {
    pub fn collection_id(&self) -> &CollectionId {
        match self {
            Mutation::CreateLedger { ledger } => &ledger.collection_id,
            Mutation::AdvanceEnumeration { collection_id, .. }
            | Mutation::AdvanceCompaction { collection_id, .. }
            | Mutation::Seal { collection_id }
            | Mutation::DeleteLedger { collection_id }
            | Mutation::InsertRecords { collection_id, .. }
            | Mutation::DeleteRecords { collection_id, .. } => collection_id,
        }
    }
}
