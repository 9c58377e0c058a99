//! Source set scanning.

use crate::error::{DroidgenError, Result};
use globwalk::{FileType, GlobWalkerBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Finds the files under `root` matching `pattern`, relative to `root`.
///
/// `**` crosses directories and `*` matches within one path segment. Patterns
/// are anchored at `root`, so `*.aidl` only matches files directly inside it.
/// A missing `root` yields an empty list, while an unreadable directory below
/// it is an error. Results are sorted.
pub fn find_files(root: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        debug!(
            "Scan root {} does not exist, no files match '{}'",
            root.display(),
            pattern
        );
        return Ok(Vec::new());
    }

    let anchored = anchor(pattern);
    let walker = GlobWalkerBuilder::from_patterns(root, &[anchored.as_str()])
        .file_type(FileType::FILE)
        .build()
        .map_err(|e| DroidgenError::pattern(pattern, e.to_string()))?;

    // The walker may report canonicalized paths.
    let canonical_root = root.canonicalize().ok();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            debug!("Failed to scan {}: {}", path.display(), e);
            DroidgenError::Scan {
                path,
                source: e.into(),
            }
        })?;

        let path = entry.path();
        let relative = path.strip_prefix(root).ok().or_else(|| {
            canonical_root
                .as_deref()
                .and_then(|canonical| path.strip_prefix(canonical).ok())
        });
        if let Some(relative) = relative {
            trace!("Matched {}", relative.display());
            files.push(relative.to_path_buf());
        }
    }

    files.sort();
    debug!(
        "Found {} file(s) matching '{}' under {}",
        files.len(),
        pattern,
        root.display()
    );
    Ok(files)
}

/// A leading `/` keeps a single-segment pattern from matching at any depth.
fn anchor(pattern: &str) -> String {
    if pattern.contains('/') {
        pattern.to_string()
    } else {
        format!("/{pattern}")
    }
}
