//! Fork specs

use crate::prelude::*;

#[test]
fn fork_copies_bounds_and_records() {
    let temp = Project::empty();
    temp.rl().args(&["push", "a", "x", "y", "z"]).passes();
    temp.rl().args(&["advance", "a", "1"]).passes();

    let out = temp.rl().args(&["fork", "a", "b"]).passes();
    similar_asserts::assert_eq!(
        out.json(),
        serde_json::json!({"collection_id": "b", "compaction_offset": 1, "enumeration_offset": 3})
    );

    let records = temp.rl().args(&["pull", "b"]).passes();
    assert_eq!(records.json().as_array().unwrap().len(), 3);
}

#[test]
fn fork_after_purge_starts_past_the_purged_prefix() {
    let temp = Project::empty();
    temp.rl().args(&["push", "a", "1", "2", "3", "4", "5"]).passes();
    temp.rl().args(&["advance", "a", "3"]).passes();
    temp.rl().args(&["purge"]).passes();

    let out = temp.rl().args(&["fork", "a", "b"]).passes();
    assert_eq!(out.json()["compaction_offset"], 3);
    assert_eq!(out.json()["enumeration_offset"], 5);
}

#[test]
fn fork_onto_existing_collection_fails() {
    let temp = Project::empty();
    temp.rl().args(&["push", "a", "x"]).passes();
    temp.rl().args(&["push", "b", "y"]).passes();

    temp.rl()
        .args(&["fork", "a", "b"])
        .fails()
        .stderr_has("conflict on b");
}
