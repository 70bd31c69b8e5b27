//! Stamps the flatnotes binary with its git revision for `--version`.
//!
//! Outside a git checkout (e.g. a crates.io tarball) every git query fails and
//! the version falls back to the bare package version.

use std::process::Command;

/// Trimmed stdout of a successful `git` invocation.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

/// A build counts as a release when HEAD carries the package version's tag and
/// the tree has no local changes.
fn is_release_build(version: &str) -> bool {
    let tagged = git(&["tag", "--points-at", "HEAD"]).is_some_and(|tags| {
        tags.lines()
            .any(|tag| tag.strip_prefix('v').unwrap_or(tag) == version)
    });
    let clean = git(&["status", "--porcelain"]).is_some_and(|status| status.is_empty());
    tagged && clean
}

fn main() {
    for watched in [".git/HEAD", ".git/index", ".git/refs/tags"] {
        println!("cargo:rerun-if-changed={}", watched);
    }

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let date = git(&["log", "-1", "--format=%cd", "--date=format:%Y-%m-%d %H:%M"])
        .unwrap_or_default();
    let release = is_release_build(env!("CARGO_PKG_VERSION"));

    println!("cargo:rustc-env=GIT_HASH={}", hash);
    println!("cargo:rustc-env=GIT_COMMIT_DATE={}", date);
    println!("cargo:rustc-env=IS_RELEASE={}", release);
}
