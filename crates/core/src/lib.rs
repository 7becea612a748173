// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rl-core: Core types for the record ledger
//!
//! This crate provides:
//! - The per-collection ledger row and its offset invariants
//! - Log records and compaction candidates
//! - Pure decision functions for forking and garbage collection
//! - A clock abstraction and TOML configuration

pub mod clock;
pub mod config;
pub mod fork;
pub mod gc;
pub mod id;
pub mod ledger;
pub mod record;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    CatalogConfig, Config, ConfigError, GcConfig, PurgeConfig, ServiceConfig, StorageConfig,
};
pub use fork::derive_fork_bounds;
pub use gc::{catalog_batches, select_for_deletion, AnswerMismatch};
pub use id::CollectionId;
pub use ledger::{Bounds, Ledger, LedgerViolation};
pub use record::{sort_candidates, CompactionCandidate, LogRecord, OffsetSpan};
