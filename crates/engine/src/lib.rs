// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Record ledger service: append, read, fork, seal, compaction support,
//! purge and catalog-driven garbage collection

mod error;
mod fork;
mod gc;
mod pull;
mod purge;
mod push;
mod service;

pub use error::LogError;
pub use gc::{GarbageCollector, GcReport};
pub use purge::PurgeReport;
pub use push::PushResult;
pub use service::LogService;
