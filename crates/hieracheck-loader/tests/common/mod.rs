// crates/hieracheck-loader/tests/common/mod.rs
// =============================================================================
// Module: Loader Test Helpers
// Description: Shared on-disk fixtures for loader tests.
// Purpose: Reduce duplication across integration tests for hieracheck-loader.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;
use tempfile::tempdir;

/// Writes `content` to `relative` under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> io::Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Creates a layer tree mirroring a small hierarchy.
///
/// - `common.yaml`: string and symbol keys
/// - `nodes/web01.example.com.yaml`: per-node overrides
/// - `os/Debian.yml`: alternate extension
/// - `README.md`: ignored extension
pub fn layer_tree() -> io::Result<TempDir> {
    let dir = tempdir()?;
    write_file(
        dir.path(),
        "common.yaml",
        "---\nntp::servers:\n  - 0.pool.ntp.org\n  - 1.pool.ntp.org\n:classes:\n  - base\nmissmatch: string\ncat: black\n",
    )?;
    write_file(
        dir.path(),
        "nodes/web01.example.com.yaml",
        "---\nmissmatch:\n  - array\nhat: fedora\n",
    )?;
    write_file(dir.path(), "os/Debian.yml", "---\nsquid: giant\n")?;
    write_file(dir.path(), "README.md", "not: data\n")?;
    Ok(dir)
}
