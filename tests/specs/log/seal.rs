//! Seal specs

use crate::prelude::*;

#[test]
fn sealed_collection_rejects_pushes_without_error() {
    let temp = Project::empty();
    temp.rl().args(&["push", "c1", "a"]).passes();
    temp.rl().args(&["seal", "c1"]).passes();

    let out = temp.rl().args(&["push", "c1", "b"]).passes();
    assert_eq!(out.json()["inserted"], 0);
    assert_eq!(out.json()["is_sealed"], true);

    let bounds = temp.rl().args(&["bounds", "c1"]).passes();
    assert_eq!(bounds.json()["enumeration_offset"], 1);
}

#[test]
fn sealing_unknown_collection_creates_it() {
    let temp = Project::empty();
    temp.rl().args(&["seal", "fresh"]).passes();
    temp.rl().args(&["seal", "fresh"]).passes();

    let out = temp.rl().args(&["bounds", "fresh"]).passes();
    assert_eq!(out.json()["enumeration_offset"], 0);
}
