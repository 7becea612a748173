// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from the backing store

use rl_core::CollectionId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the commit: duplicate ledger row or
    /// duplicate `(collection_id, offset)` record key
    #[error("conflict on {collection_id}: {detail}")]
    Conflict {
        collection_id: CollectionId,
        detail: String,
    },
    #[error("ledger row not found: {0}")]
    NotFound(CollectionId),
    #[error("ledger invariant violated for {collection_id}: {detail}")]
    Invariant {
        collection_id: CollectionId,
        detail: String,
    },
    #[error("store directory is locked by another process: {0}")]
    Locked(PathBuf),
    #[error("corrupt store data: {0}")]
    Corrupt(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn conflict(collection_id: &CollectionId, detail: impl Into<String>) -> Self {
        Self::Conflict {
            collection_id: collection_id.clone(),
            detail: detail.into(),
        }
    }

    pub(crate) fn invariant(collection_id: &CollectionId, detail: impl Into<String>) -> Self {
        Self::Invariant {
            collection_id: collection_id.clone(),
            detail: detail.into(),
        }
    }

    /// Whether redoing the whole transaction may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Conflict { .. } | StoreError::Io(_))
    }
}
