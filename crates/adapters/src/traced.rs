// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::catalog::{CatalogAdapter, CatalogError};
use async_trait::async_trait;
use rl_core::CollectionId;

/// Wrapper that adds tracing to any CatalogAdapter
#[derive(Clone)]
pub struct TracedCatalogAdapter<C> {
    inner: C,
}

impl<C> TracedCatalogAdapter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: CatalogAdapter> CatalogAdapter for TracedCatalogAdapter<C> {
    async fn check_collections_exist(
        &self,
        ids: &[CollectionId],
    ) -> Result<Vec<bool>, CatalogError> {
        let span = tracing::info_span!("catalog.check_exist", batch = ids.len());
        let _guard = span.enter();

        tracing::debug!("asking catalog");

        let start = std::time::Instant::now();
        let result = self.inner.check_collections_exist(ids).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(answers) => tracing::info!(
                missing = answers.iter().filter(|exists| !**exists).count(),
                elapsed_ms = elapsed.as_millis() as u64,
                "catalog answered"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "catalog lookup failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
