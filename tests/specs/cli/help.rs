//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_operation() {
    let out = rl().args(&["--help"]).passes();
    let out = out.stdout_has("push").stdout_has("pull").stdout_has("fork");
    out.stdout_has("seal")
        .stdout_has("bounds")
        .stdout_has("advance")
        .stdout_has("candidates")
        .stdout_has("purge")
        .stdout_has("gc");
}

#[test]
fn pull_help_describes_offsets() {
    rl().args(&["pull", "--help"])
        .passes()
        .stdout_has("--from")
        .stdout_has("--end-timestamp");
}
