//! Locating optional test archives.

use std::path::PathBuf;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(|p| p.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// `crates/<crate_name>/testdata` under the workspace root.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root().join("crates").join(crate_name).join("testdata")
}

/// Find a test archive by file name.
///
/// Looks in `$TEST_DATA_DIR`, then `crates/frame-archive/testdata/`, then
/// `testdata/` at the workspace root.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let env_dir = std::env::var_os("TEST_DATA_DIR").map(PathBuf::from);
    env_dir
        .into_iter()
        .chain([crate_testdata_dir("frame-archive"), workspace_root().join("testdata")])
        .map(|dir| dir.join(name))
        .find(|path| path.exists())
}

/// Temporary directory whose name starts with `prefix`, removed on drop.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_holds_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
        assert!(workspace_root().join("crates").join("test-utils").exists());
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(find_test_file("no_such_archive_len_1.h5").is_none());
    }

    #[test]
    fn test_temp_dir_prefix() {
        let dir = temp_test_dir_with_prefix("frame_test_");
        let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("frame_test_"));
    }
}
