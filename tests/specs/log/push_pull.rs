//! Append and read specs

use crate::prelude::*;

#[test]
fn push_reports_inserted_count() {
    let temp = Project::empty();
    let out = temp.rl().args(&["push", "c1", "a", "b", "c"]).passes();

    similar_asserts::assert_eq!(
        out.json(),
        serde_json::json!({"collection_id": "c1", "inserted": 3, "is_sealed": false})
    );
}

#[test]
fn pushes_persist_between_invocations() {
    let temp = Project::empty();
    temp.rl().args(&["push", "c1", "a", "b"]).passes();
    temp.rl().args(&["push", "c1", "c"]).passes();

    let out = temp.rl().args(&["bounds", "c1"]).passes();
    assert_eq!(out.json()["enumeration_offset"], 3);
    assert_eq!(out.json()["compaction_offset"], 0);
}

#[test]
fn pull_returns_records_in_offset_order() {
    let temp = Project::empty();
    temp.rl().args(&["push", "c1", "first", "second", "third"]).passes();

    let out = temp.rl().args(&["pull", "c1", "--from", "2"]).passes();
    let records = out.json();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["offset"], 2);
    assert_eq!(records[0]["payload"], "second");
    assert_eq!(records[1]["offset"], 3);
}

#[test]
fn pull_honors_batch_size() {
    let temp = Project::empty();
    temp.rl().args(&["push", "c1", "a", "b", "c", "d"]).passes();

    let out = temp.rl().args(&["pull", "c1", "--batch", "2"]).passes();
    assert_eq!(out.json().as_array().unwrap().len(), 2);
}

#[test]
fn text_format_prints_one_line_per_record() {
    let temp = Project::empty();
    temp.rl().args(&["push", "c1", "hello"]).passes();

    temp.rl()
        .args(&["--format", "text", "pull", "c1"])
        .passes()
        .stdout_has("hello");
}
