//! Locating solver output for tests and creating scratch directories.
//!
//! Real solver runs are too large to check in. Tests that want one look it
//! up with [`find_test_file`] and skip when it is absent.

use std::path::PathBuf;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or(manifest_dir)
}

/// `crates/{crate_name}/testdata`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root().join("crates").join(crate_name).join("testdata")
}

/// First existing copy of `name`.
///
/// Looks in `$TEST_DATA_DIR`, then `crates/table-reader/testdata`, then
/// `testdata` at the workspace root.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let from_env = std::env::var_os("TEST_DATA_DIR").map(|dir| PathBuf::from(dir).join(name));

    from_env
        .into_iter()
        .chain([
            crate_testdata_dir("table-reader").join(name),
            workspace_root().join("testdata").join(name),
        ])
        .find(|path| path.is_file())
}

/// Scratch directory removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Scratch directory whose name starts with `prefix`.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}
