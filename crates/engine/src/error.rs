// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the log service

use rl_adapters::CatalogError;
use rl_core::CollectionId;
use rl_storage::StoreError;
use thiserror::Error;

/// Errors returned by [`LogService`](crate::LogService) and
/// [`GarbageCollector`](crate::GarbageCollector)
#[derive(Debug, Error)]
pub enum LogError {
    /// Lost a race on offset assignment or row creation; redo the whole call
    #[error("conflict on {collection_id}: {detail}")]
    Conflict {
        collection_id: CollectionId,
        detail: String,
    },
    /// The requested offset was compacted and purged; the reader must resync
    #[error("offset {from_offset} of {collection_id} was purged (compacted through {compaction_offset})")]
    Purged {
        collection_id: CollectionId,
        from_offset: u64,
        compaction_offset: u64,
    },
    #[error("collection not found: {0}")]
    NotFound(CollectionId),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("store error: {0}")]
    Store(#[source] StoreError),
}

impl LogError {
    /// Whether the caller may simply retry the same call
    pub fn is_retryable(&self) -> bool {
        match self {
            LogError::Conflict { .. } => true,
            LogError::Store(e) => e.is_transient(),
            _ => false,
        }
    }
}

impl From<StoreError> for LogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict {
                collection_id,
                detail,
            } => LogError::Conflict {
                collection_id,
                detail,
            },
            StoreError::NotFound(id) => LogError::NotFound(id),
            StoreError::Invariant { detail, .. } => LogError::InvalidArgument(detail),
            other => LogError::Store(other),
        }
    }
}
