// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn cid(id: &str) -> CollectionId {
    CollectionId::from(id)
}

fn record(id: &str, offset: u64, ts: i64) -> LogRecord {
    LogRecord::new(cid(id), offset, ts, format!("r{}", offset).into_bytes())
}

fn insert(id: &str, offsets: std::ops::RangeInclusive<u64>) -> Mutation {
    Mutation::InsertRecords {
        collection_id: cid(id),
        records: offsets.map(|o| record(id, o, o as i64 * 10)).collect(),
    }
}

fn tables_with(id: &str, enumeration: u64, compaction: u64) -> MaterializedTables {
    let mut tables = MaterializedTables::new();
    let mut ledger = Ledger::new(cid(id));
    ledger.enumeration_offset = enumeration;
    ledger.compaction_offset = compaction;
    let mut batch = vec![Mutation::CreateLedger { ledger }];
    if enumeration > 0 {
        batch.push(insert(id, 1..=enumeration));
    }
    tables.apply_all(&batch).unwrap();
    tables
}

#[test]
fn create_ledger_then_insert_records() {
    let tables = tables_with("c1", 3, 0);
    assert_eq!(tables.ledger(&cid("c1")).unwrap().enumeration_offset, 3);
    assert_eq!(tables.record_count(), 3);
    assert_eq!(tables.offset_span(&cid("c1")), Some(OffsetSpan::new(1, 3)));
}

#[test]
fn duplicate_ledger_row_conflicts() {
    let mut tables = tables_with("c1", 0, 0);
    let result = tables.apply_all(&[Mutation::CreateLedger {
        ledger: Ledger::new(cid("c1")),
    }]);
    assert!(matches!(result, Err(StoreError::Conflict { .. })));
}

#[test]
fn duplicate_record_key_conflicts_and_applies_nothing() {
    let mut tables = tables_with("c1", 2, 0);
    let before = tables.clone();

    let result = tables.apply_all(&[
        Mutation::AdvanceEnumeration {
            collection_id: cid("c1"),
            offset: 3,
        },
        insert("c1", 2..=3),
    ]);

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(tables, before);
}

#[test]
fn duplicate_offsets_within_one_batch_conflict() {
    let mut tables = tables_with("c1", 0, 0);
    let result = tables.apply_all(&[insert("c1", 1..=1), insert("c1", 1..=1)]);
    assert!(matches!(result, Err(StoreError::Conflict { .. })));
}

#[test]
fn record_for_other_collection_is_rejected() {
    let mut tables = tables_with("c1", 0, 0);
    let result = tables.apply_all(&[Mutation::InsertRecords {
        collection_id: cid("c1"),
        records: vec![record("c2", 1, 0)],
    }]);
    assert!(matches!(result, Err(StoreError::Invariant { .. })));
}

#[test]
fn update_of_missing_row_is_not_found() {
    let mut tables = MaterializedTables::new();
    let result = tables.apply_all(&[Mutation::Seal {
        collection_id: cid("ghost"),
    }]);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn delete_then_reinsert_same_offset_in_one_batch() {
    let mut tables = tables_with("c1", 2, 0);
    tables
        .apply_all(&[
            Mutation::DeleteRecords {
                collection_id: cid("c1"),
                first: 2,
                last: 2,
            },
            insert("c1", 2..=2),
        ])
        .unwrap();
    assert_eq!(tables.record_count(), 2);
}

#[test]
fn delete_ledger_then_recreate_in_one_batch() {
    let mut tables = tables_with("c1", 0, 0);
    tables
        .apply_all(&[
            Mutation::DeleteLedger {
                collection_id: cid("c1"),
            },
            Mutation::CreateLedger {
                ledger: Ledger::sealed(cid("c1")),
            },
        ])
        .unwrap();
    assert!(tables.ledger(&cid("c1")).unwrap().is_sealed);
}

#[test]
fn delete_records_drops_empty_collections() {
    let mut tables = tables_with("c1", 3, 0);
    tables
        .apply_all(&[Mutation::DeleteRecords {
            collection_id: cid("c1"),
            first: 1,
            last: 3,
        }])
        .unwrap();
    assert!(tables.records(&cid("c1")).is_none());
    assert_eq!(tables.offset_span(&cid("c1")), None);
}

#[test]
fn scan_honors_offset_limit_and_end_timestamp() {
    let tables = tables_with("c1", 5, 0);

    let offsets = |records: Vec<LogRecord>| records.iter().map(|r| r.offset).collect::<Vec<_>>();

    assert_eq!(offsets(tables.scan(&cid("c1"), 2, 10, None)), vec![2, 3, 4, 5]);
    assert_eq!(offsets(tables.scan(&cid("c1"), 2, 2, None)), vec![2, 3]);
    // timestamps are offset * 10
    assert_eq!(offsets(tables.scan(&cid("c1"), 1, 10, Some(30))), vec![1, 2, 3]);
    assert!(tables.scan(&cid("c1"), 6, 10, None).is_empty());
    assert!(tables.scan(&cid("missing"), 1, 10, None).is_empty());
}

#[test]
fn compaction_candidates_respect_min_size_and_order() {
    let mut tables = tables_with("old", 4, 1);
    let mut young = Ledger::new(cid("young"));
    young.enumeration_offset = 1;
    tables
        .apply_all(&[
            Mutation::CreateLedger { ledger: young },
            Mutation::InsertRecords {
                collection_id: cid("young"),
                records: vec![record("young", 1, 1_000)],
            },
        ])
        .unwrap();

    let all = tables.compaction_candidates(0);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].collection_id, cid("old"));
    assert_eq!(all[0].next_offset, 2);
    assert_eq!(all[0].oldest_timestamp_nanos, 20);
    assert_eq!(all[1].collection_id, cid("young"));

    let big = tables.compaction_candidates(2);
    assert_eq!(big.len(), 1);
    assert_eq!(big[0].collection_id, cid("old"));
}

#[test]
fn fully_compacted_collection_is_not_a_candidate() {
    let tables = tables_with("c1", 3, 3);
    assert!(tables.compaction_candidates(0).is_empty());
}

#[test]
fn from_parts_round_trips_through_accessors() {
    let tables = tables_with("c1", 2, 1);
    let rebuilt = MaterializedTables::from_parts(
        tables.ledgers().cloned().collect(),
        tables.all_records().cloned().collect(),
    );
    assert_eq!(rebuilt, tables);
}

#[parameterized(
    below_min = { 2, 3, false },
    at_min = { 3, 3, true },
    zero_min_counts_as_one = { 1, 0, true },
)]
fn candidate_threshold(uncompacted: u64, min_size: u64, expected: bool) {
    let tables = tables_with("c1", 5, 5 - uncompacted);
    assert_eq!(!tables.compaction_candidates(min_size).is_empty(), expected);
}

proptest! {
    #[test]
    fn scan_is_ascending_bounded_and_starts_at_from(
        enumeration in 0u64..20,
        from in 0u64..25,
        limit in 0usize..30,
    ) {
        let tables = tables_with("c1", enumeration, 0);
        let scanned = tables.scan(&cid("c1"), from, limit, None);

        prop_assert!(scanned.len() <= limit);
        prop_assert!(scanned.iter().all(|r| r.offset >= from));
        prop_assert!(scanned.windows(2).all(|w| w[1].offset == w[0].offset + 1));
        let available = enumeration.saturating_sub(from.max(1) - 1) as usize;
        prop_assert_eq!(scanned.len(), available.min(limit));
    }
}
