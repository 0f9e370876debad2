//! registry
//!
//! Process-wide table of memory-backed repositories.
//!
//! # Overview
//!
//! A memory-backed repository has no location a later caller could open it
//! by, so its resources are recorded here under the repository's logical
//! path. Keys are normalized the way client configuration normalizes
//! paths: `./repo` and `/work/repo` are one key when the current directory
//! is `/work`. Entries live until removed: nothing is evicted implicitly,
//! which is what lets several clients share one memory repository by path.
//!
//! Each entry holds two resources:
//! - [`MemoryStorage`] - object database, refs, and index
//! - [`MemoryFs`] - the working tree
//!
//! Both are scratch areas owned by this process. They are never at the
//! logical path and are deleted when the last owner (registry entry or
//! repository handle) drops them.
//!
//! # Concurrency
//!
//! All operations take `&self` and are internally serialized. Callers never
//! lock anything themselves.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use std::sync::Arc;
//! use vcs_client::registry::{MemoryFs, MemoryRegistry, MemoryStorage};
//!
//! let registry = MemoryRegistry::new();
//! let storage = Arc::new(MemoryStorage::new().unwrap());
//! let fs = Arc::new(MemoryFs::new().unwrap());
//!
//! registry.put(Path::new("/virtual/repo"), storage, fs);
//! assert!(registry.contains(Path::new("/virtual/repo")));
//!
//! registry.remove(Path::new("/virtual/repo"));
//! assert!(registry.get(Path::new("/virtual/repo")).is_none());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};

use tempfile::TempDir;

use crate::core::paths;

/// Storage half of a memory repository: the git directory.
#[derive(Debug)]
pub struct MemoryStorage {
    dir: TempDir,
}

impl MemoryStorage {
    /// Allocate an empty storage area.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("vcs-mem-storage-").tempdir()?;
        Ok(Self { dir })
    }

    /// Location of the git directory.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Filesystem half of a memory repository: the working tree.
#[derive(Debug)]
pub struct MemoryFs {
    dir: TempDir,
}

impl MemoryFs {
    /// Allocate an empty working tree.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("vcs-mem-fs-").tempdir()?;
        Ok(Self { dir })
    }

    /// Root of the working tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// One registry entry.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    pub storage: Arc<MemoryStorage>,
    pub fs: Arc<MemoryFs>,
}

/// Concurrency-safe map from logical repository path to memory resources.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: RwLock<HashMap<PathBuf, MemoryEntry>>,
}

impl MemoryRegistry {
    /// Create an isolated registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> Arc<MemoryRegistry> {
        static GLOBAL: OnceLock<Arc<MemoryRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(MemoryRegistry::new())))
    }

    /// Record resources for `path`, silently replacing any previous entry.
    pub fn put(&self, path: &Path, storage: Arc<MemoryStorage>, fs: Arc<MemoryFs>) {
        let key = key(path);
        let replaced = self
            .write()
            .insert(key.clone(), MemoryEntry { storage, fs })
            .is_some();
        tracing::debug!(path = %key.display(), replaced, "registered memory repository");
    }

    /// Look up both resources for `path`.
    pub fn get(&self, path: &Path) -> Option<MemoryEntry> {
        self.read().get(&key(path)).cloned()
    }

    /// The storage resource for `path`.
    pub fn storage(&self, path: &Path) -> Option<Arc<MemoryStorage>> {
        self.read().get(&key(path)).map(|e| Arc::clone(&e.storage))
    }

    /// The filesystem resource for `path`.
    pub fn filesystem(&self, path: &Path) -> Option<Arc<MemoryFs>> {
        self.read().get(&key(path)).map(|e| Arc::clone(&e.fs))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.read().contains_key(&key(path))
    }

    /// Forget `path`. Removing an absent path is a no-op.
    pub fn remove(&self, path: &Path) -> Option<MemoryEntry> {
        let removed = self.write().remove(&key(path));
        tracing::debug!(
            path = %path.display(),
            found = removed.is_some(),
            "removed memory repository"
        );
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Every operation is a single HashMap call, so a poisoned lock still
    // guards a consistent map.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<PathBuf, MemoryEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<PathBuf, MemoryEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Registry key for `path`: absolute, with `.` and `..` folded, so every
/// spelling of one location finds the same entry.
fn key(path: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => paths::absolutize(path, &cwd),
        Err(_) => path.to_path_buf(),
    }
}
