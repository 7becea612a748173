// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collection catalog adapters
//!
//! The catalog is the system of record for which collections exist. The
//! garbage collector asks it about every collection that still has a
//! ledger row and deletes the ones it no longer knows.

mod http;
mod noop;

pub use http::HttpCatalogAdapter;
pub use noop::NoOpCatalogAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CatalogCall, FakeCatalogAdapter};

use async_trait::async_trait;
use rl_core::CollectionId;
use thiserror::Error;

/// Errors from catalog lookups
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(String),
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Adapter for the external collection catalog
#[async_trait]
pub trait CatalogAdapter: Clone + Send + Sync + 'static {
    /// One existence answer per id, positionally aligned with `ids`
    async fn check_collections_exist(
        &self,
        ids: &[CollectionId],
    ) -> Result<Vec<bool>, CatalogError>;
}
