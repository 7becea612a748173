// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op catalog adapter for when no catalog is configured.

use super::{CatalogAdapter, CatalogError};
use async_trait::async_trait;
use rl_core::CollectionId;

/// Catalog adapter that reports every collection as existing.
///
/// Garbage collection never deletes anything through it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpCatalogAdapter;

impl NoOpCatalogAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogAdapter for NoOpCatalogAdapter {
    async fn check_collections_exist(
        &self,
        ids: &[CollectionId],
    ) -> Result<Vec<bool>, CatalogError> {
        Ok(vec![true; ids.len()])
    }
}
