//! client::lifecycle
//!
//! Deciding how a repository comes into being, and how it goes away.
//!
//! # Decision Procedure
//!
//! Disk-backed (`is_memory = false`):
//! 1. `path` already holds a repository: open it. A remote URL is kept in
//!    the configuration but not used.
//! 2. Otherwise, with a remote URL: clone into `path`, which must be
//!    missing or empty.
//! 3. Otherwise: initialize an empty repository at `path`.
//!
//! Memory-backed (`is_memory = true`): allocate fresh scratch storage and
//! working tree, clone into them or initialize them, then record both in
//! the memory registry under `path` before returning.
//!
//! Engine failures (network, authentication) propagate unchanged and are
//! never retried.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::AuthStrategy;
use crate::core::config::ClientConfig;
use crate::git::{Git, GitError};
use crate::registry::{MemoryEntry, MemoryFs, MemoryRegistry, MemoryStorage};

/// Where a repository's objects and working tree live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Durable, at the configured path.
    Disk,
    /// Transient, process-owned, recorded in the memory registry.
    Memory,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Disk => f.write_str("disk"),
            Backend::Memory => f.write_str("memory"),
        }
    }
}

/// A live repository plus the resources it owns.
///
/// Field order matters: the engine handle drops before the memory
/// resources it points into.
pub struct RepositoryHandle {
    git: Git,
    backend: Backend,
    path: PathBuf,
    memory: Option<MemoryEntry>,
}

impl fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("backend", &self.backend)
            .field("path", &self.path)
            .field("git", &self.git)
            .finish()
    }
}

impl RepositoryHandle {
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Canonical path; the registry key for memory-backed repositories.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root of the working tree. For memory-backed repositories this is the
    /// scratch area, not [`path`](Self::path).
    pub fn work_dir(&self) -> &Path {
        match &self.memory {
            Some(entry) => entry.fs.root(),
            None => self.git.work_dir().unwrap_or(&self.path),
        }
    }

    /// The engine interface.
    pub fn git(&self) -> &Git {
        &self.git
    }
}

/// Open, clone, or initialize the repository `config` describes.
pub fn establish(config: &ClientConfig, auth: &AuthStrategy) -> Result<RepositoryHandle, GitError> {
    if config.is_memory() {
        establish_memory(config, auth)
    } else {
        establish_disk(config, auth)
    }
}

fn establish_disk(config: &ClientConfig, auth: &AuthStrategy) -> Result<RepositoryHandle, GitError> {
    let path = config.path();
    if path.exists() && !path.is_dir() {
        return Err(GitError::InvalidRepoPath {
            path: path.to_path_buf(),
            reason: "not a directory".into(),
        });
    }

    let git = if Git::exists_at(path) {
        tracing::debug!(path = %path.display(), "opening existing repository");
        Git::open(path)?
    } else if let Some(url) = config.remote_url() {
        tracing::info!(path = %path.display(), url, auth = %auth.auth_type(), "cloning repository");
        Git::clone_repo(url, path, auth)?
    } else {
        tracing::debug!(path = %path.display(), "initializing repository");
        Git::init(path)?
    };

    Ok(RepositoryHandle {
        git,
        backend: Backend::Disk,
        path: path.to_path_buf(),
        memory: None,
    })
}

fn establish_memory(
    config: &ClientConfig,
    auth: &AuthStrategy,
) -> Result<RepositoryHandle, GitError> {
    let path = config.path();
    let storage = Arc::new(MemoryStorage::new().map_err(scratch_error)?);
    let fs = Arc::new(MemoryFs::new().map_err(scratch_error)?);

    let git = match config.remote_url() {
        Some(url) => {
            tracing::info!(path = %path.display(), url, auth = %auth.auth_type(), "cloning repository into memory");
            Git::clone_split(url, storage.root(), fs.root(), auth)?
        }
        None => {
            tracing::debug!(path = %path.display(), "initializing memory repository");
            Git::init_split(storage.root(), fs.root())?
        }
    };

    config
        .registry()
        .put(path, Arc::clone(&storage), Arc::clone(&fs));

    Ok(RepositoryHandle {
        git,
        backend: Backend::Memory,
        path: path.to_path_buf(),
        memory: Some(MemoryEntry { storage, fs }),
    })
}

/// Reopen a memory-backed repository another client registered under
/// `config.path()`.
pub fn attach(config: &ClientConfig) -> Result<RepositoryHandle, GitError> {
    let path = config.path();
    let entry = config
        .registry()
        .get(path)
        .ok_or_else(|| GitError::InvalidRepoPath {
            path: path.to_path_buf(),
            reason: "no memory repository registered at this path".into(),
        })?;

    tracing::debug!(path = %path.display(), "attaching to memory repository");
    let git = Git::open_split(entry.storage.root(), entry.fs.root())?;
    Ok(RepositoryHandle {
        git,
        backend: Backend::Memory,
        path: path.to_path_buf(),
        memory: Some(entry),
    })
}

/// Release everything `handle` owns.
///
/// Disk: the repository directory is deleted recursively and failures are
/// returned. Memory: the registry entry is removed; an absent entry is fine.
pub fn dispose(handle: RepositoryHandle, registry: &MemoryRegistry) -> Result<(), GitError> {
    let RepositoryHandle {
        git,
        backend,
        path,
        memory,
    } = handle;
    drop(git);

    match backend {
        Backend::Disk => {
            fs::remove_dir_all(&path).map_err(|source| GitError::Io {
                path: path.clone(),
                source,
            })?;
        }
        Backend::Memory => {
            registry.remove(&path);
            drop(memory);
        }
    }

    tracing::info!(path = %path.display(), %backend, "disposed repository");
    Ok(())
}

fn scratch_error(source: io::Error) -> GitError {
    GitError::Io {
        path: std::env::temp_dir(),
        source,
    }
}
