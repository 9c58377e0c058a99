//! Removal of stale generated files.
//!
//! A stale file left behind can shadow freshly generated output, so every
//! deletion failure is an error.

use crate::error::{DroidgenError, Result};
use crate::scanner::find_files;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Deletes every file under `root` matching `pattern` and returns how many
/// were removed. A missing `root` or zero matches deletes nothing.
pub fn delete_matching(root: impl AsRef<Path>, pattern: &str) -> Result<usize> {
    let root = root.as_ref();
    let files = find_files(root, pattern)?;

    for relative in &files {
        let path = root.join(relative);
        debug!("Deleting {}", path.display());
        fs::remove_file(&path)
            .map_err(|source| DroidgenError::FileDeletionFailed { path, source })?;
    }

    Ok(files.len())
}

/// Deletes `path` if it exists. Returns whether a file was removed.
pub fn delete_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(false);
    }

    debug!("Deleting {}", path.display());
    fs::remove_file(path).map_err(|source| DroidgenError::FileDeletionFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// generated").unwrap();
    }

    #[test]
    fn test_delete_matching_removes_all_and_counts() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "R.java");
        touch(dir.path(), "com/example/R.java");
        touch(dir.path(), "com/example/app/R.java");
        touch(dir.path(), "com/example/Main.java");

        let deleted = delete_matching(dir.path(), "**/R.java").unwrap();

        assert_eq!(deleted, 3);
        assert!(find_files(dir.path(), "**/R.java").unwrap().is_empty());
        assert!(dir.path().join("com/example/Main.java").exists());
    }

    #[test]
    fn test_delete_matching_zero_matches() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "com/example/Main.java");
        assert_eq!(delete_matching(dir.path(), "**/R.java").unwrap(), 0);
    }

    #[test]
    fn test_delete_matching_missing_root() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            delete_matching(dir.path().join("missing"), "**/R.java").unwrap(),
            0
        );
    }

    #[test]
    fn test_delete_if_exists() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "drawable/Thumbs.db");
        let thumbs = dir.path().join("drawable/Thumbs.db");

        assert!(delete_if_exists(&thumbs).unwrap());
        assert!(!thumbs.exists());
        assert!(!delete_if_exists(&thumbs).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_failure_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "locked/R.java");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users can delete from read-only directories.
        let marker = locked.join(".marker");
        if fs::write(&marker, "").is_ok() {
            let _ = fs::remove_file(&marker);
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = delete_matching(dir.path(), "**/R.java");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(DroidgenError::FileDeletionFailed { path, .. }) => {
                assert!(path.ends_with("locked/R.java"));
            }
            other => panic!("expected deletion failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_if_exists_failure_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "drawable/Thumbs.db");
        let drawable = dir.path().join("drawable");
        fs::set_permissions(&drawable, fs::Permissions::from_mode(0o555)).unwrap();

        let marker = drawable.join(".marker");
        if fs::write(&marker, "").is_ok() {
            let _ = fs::remove_file(&marker);
            fs::set_permissions(&drawable, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = delete_if_exists(drawable.join("Thumbs.db"));
        fs::set_permissions(&drawable, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(DroidgenError::FileDeletionFailed { path, .. }) => {
                assert!(path.ends_with("drawable/Thumbs.db"));
            }
            other => panic!("expected deletion failure, got {other:?}"),
        }
        assert!(drawable.join("Thumbs.db").exists());
    }
}
