use std::process::{Command, Output};

/// Run `git` with `args`, returning its output only when it exits cleanly.
fn git(args: &[&str]) -> Option<Output> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
}

fn main() {
    // `--version` shows the commit, so rebuild whenever HEAD moves.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    // Empty outside a git checkout (e.g. a crates.io tarball).
    let commit = git(&["rev-parse", "--short", "HEAD"])
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    // Tagged builds report the plain package version instead of dev@<commit>.
    let release = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=GIT_HASH={commit}");
    println!("cargo:rustc-env=ON_RELEASE_TAG={release}");
}
