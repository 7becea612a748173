//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    rl().args(&["frobnicate"]).fails();
}

#[test]
fn bounds_of_unknown_collection_fails() {
    let temp = Project::empty();
    temp.rl()
        .args(&["bounds", "ghost"])
        .fails()
        .stderr_has("collection not found: ghost");
}

#[test]
fn pull_from_offset_zero_reports_purged() {
    let temp = Project::empty();
    temp.rl().args(&["push", "c1", "a"]).passes();
    temp.rl()
        .args(&["pull", "c1", "--from", "0"])
        .fails()
        .stderr_has("offset 0 of c1 was purged");
}

#[test]
fn pull_with_zero_batch_is_rejected() {
    let temp = Project::empty();
    temp.rl()
        .args(&["pull", "c1", "--batch", "0"])
        .fails()
        .stderr_has("invalid argument");
}

#[test]
fn advancing_past_enumeration_is_rejected() {
    let temp = Project::empty();
    temp.rl().args(&["push", "c1", "a"]).passes();
    temp.rl()
        .args(&["advance", "c1", "5"])
        .fails()
        .stderr_has("past enumeration offset");
}
