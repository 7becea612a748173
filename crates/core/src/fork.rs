// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounds derivation for forked collections
//!
//! A fork copies whatever records the source still holds. The source's early
//! history may already be purged, so the target's bounds come from what was
//! actually copied rather than from the source row alone.

use crate::ledger::Bounds;
use crate::record::OffsetSpan;

/// Derive the bounds a fork target starts from.
///
/// - Nothing copied: the target inherits the source bounds unchanged.
/// - Otherwise everything below the lowest copied offset counts as compacted,
///   and the target never claims offsets above the highest copied one.
pub fn derive_fork_bounds(source: Bounds, copied: Option<OffsetSpan>) -> Bounds {
    let Some(span) = copied else {
        return source;
    };

    let compaction_offset = source.compaction_offset.max(span.min.saturating_sub(1));
    Bounds {
        compaction_offset: compaction_offset.min(span.max),
        enumeration_offset: span.max,
    }
}
