use std::path::{Path, PathBuf};
use tracing::debug;

/// The enclosing build's view of a generation run.
///
/// Tasks only ever append compile source roots; nothing reads them back during
/// the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSession {
    compile_source_roots: Vec<PathBuf>,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `root` as a directory whose sources must be compiled.
    /// Returns `false` if it was already registered.
    pub fn add_compile_source_root(&mut self, root: impl Into<PathBuf>) -> bool {
        let root = root.into();
        if self.is_registered(&root) {
            return false;
        }
        debug!("Registered compile source root {}", root.display());
        self.compile_source_roots.push(root);
        true
    }

    pub fn compile_source_roots(&self) -> &[PathBuf] {
        &self.compile_source_roots
    }

    pub fn is_registered(&self, root: &Path) -> bool {
        self.compile_source_roots.iter().any(|r| r == root)
    }
}
