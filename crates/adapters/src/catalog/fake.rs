// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake catalog adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CatalogAdapter, CatalogError};
use async_trait::async_trait;
use rl_core::CollectionId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recorded catalog call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    CheckExist { ids: Vec<CollectionId> },
}

#[derive(Default)]
struct FakeCatalogState {
    known: HashSet<CollectionId>,
    calls: Vec<CatalogCall>,
    fail_on_call: Option<usize>,
    short_answers: bool,
}

/// Fake catalog adapter for testing
///
/// Collections are unknown until [`add`](Self::add)ed.
#[derive(Clone, Default)]
pub struct FakeCatalogAdapter {
    inner: Arc<Mutex<FakeCatalogState>>,
}

impl FakeCatalogAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog that knows the given collections
    pub fn with_collections<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CollectionId>,
    {
        let adapter = Self::new();
        for id in ids {
            adapter.add(id);
        }
        adapter
    }

    pub fn add(&self, id: impl Into<CollectionId>) {
        self.state().known.insert(id.into());
    }

    pub fn remove(&self, id: &CollectionId) {
        self.state().known.remove(id);
    }

    /// Fail the `n`th call (zero-based) with a request error
    pub fn fail_on_call(&self, n: usize) {
        self.state().fail_on_call = Some(n);
    }

    /// Answer with one fewer entry than asked
    pub fn answer_short(&self) {
        self.state().short_answers = true;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.state().calls.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeCatalogState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CatalogAdapter for FakeCatalogAdapter {
    async fn check_collections_exist(
        &self,
        ids: &[CollectionId],
    ) -> Result<Vec<bool>, CatalogError> {
        let mut state = self.state();
        let call_index = state.calls.len();
        state.calls.push(CatalogCall::CheckExist { ids: ids.to_vec() });

        if state.fail_on_call == Some(call_index) {
            return Err(CatalogError::Request("injected failure".to_string()));
        }

        let mut answers: Vec<bool> = ids.iter().map(|id| state.known.contains(id)).collect();
        if state.short_answers {
            answers.pop();
        }
        Ok(answers)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
