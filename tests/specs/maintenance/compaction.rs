//! Compaction support and purge specs

use crate::prelude::*;

#[test]
fn c1_scenario() {
    let temp = Project::empty();

    temp.rl().args(&["push", "c1", "r1", "r2", "r3"]).passes();
    let bounds = temp.rl().args(&["bounds", "c1"]).passes();
    assert_eq!(bounds.json()["enumeration_offset"], 3);

    let pulled = temp.rl().args(&["pull", "c1", "--from", "1", "--batch", "10"]).passes();
    let offsets: Vec<u64> = pulled
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["offset"].as_u64().unwrap())
        .collect();
    assert_eq!(offsets, vec![1, 2, 3]);

    temp.rl().args(&["advance", "c1", "3"]).passes();
    let purge = temp.rl().args(&["purge"]).passes();
    assert_eq!(purge.json()["purged"], 3);

    temp.rl()
        .args(&["pull", "c1", "--from", "1"])
        .fails()
        .stderr_has("was purged");

    let tail = temp.rl().args(&["pull", "c1", "--from", "4"]).passes();
    assert_eq!(tail.json(), serde_json::json!([]));
}

#[test]
fn candidates_list_uncompacted_collections() {
    let temp = Project::empty();
    temp.rl().args(&["push", "busy", "a", "b", "c"]).passes();
    temp.rl().args(&["push", "idle", "a"]).passes();
    temp.rl().args(&["advance", "idle", "1"]).passes();

    let out = temp.rl().args(&["candidates"]).passes();
    let candidates = out.json();
    let candidates = candidates.as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["collection_id"], "busy");
    assert_eq!(candidates[0]["next_offset"], 1);

    let strict = temp.rl().args(&["candidates", "--min-size", "4"]).passes();
    assert_eq!(strict.json(), serde_json::json!([]));
}
