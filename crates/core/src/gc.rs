// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure selection step of garbage collection
//!
//! The collector asks the catalog about ledger ids in batches and deletes
//! exactly those the catalog reports as absent. Selection is kept free of
//! I/O so it can be tested without a store or a catalog.

use crate::id::CollectionId;
use thiserror::Error;

/// Catalog answer that cannot be matched to the ids asked about
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("catalog answered {answers} existence checks for {asked} collections")]
pub struct AnswerMismatch {
    pub asked: usize,
    pub answers: usize,
}

/// Split ids into batches of at most `batch_size` for catalog lookups
pub fn catalog_batches(
    ids: &[CollectionId],
    batch_size: usize,
) -> std::slice::Chunks<'_, CollectionId> {
    ids.chunks(batch_size.max(1))
}

/// Return the ids the catalog reported as not existing, in input order.
///
/// `exists[i]` answers `ids[i]`. Ids answered `true` are never selected.
pub fn select_for_deletion(
    ids: &[CollectionId],
    exists: &[bool],
) -> Result<Vec<CollectionId>, AnswerMismatch> {
    if ids.len() != exists.len() {
        return Err(AnswerMismatch {
            asked: ids.len(),
            answers: exists.len(),
        });
    }

    Ok(ids
        .iter()
        .zip(exists)
        .filter(|(_, exists)| !**exists)
        .map(|(id, _)| id.clone())
        .collect())
}

#[cfg(test)]
#[path = "gc_tests.rs"]
mod tests;
