//! client
//!
//! The Git client facade.
//!
//! # Overview
//!
//! A [`GitClient`] is constructed from [`ClientOptions`]. Construction
//! validates the options, resolves an [`AuthStrategy`], and leaves the
//! client holding a live repository: opened, cloned, or initialized, on
//! disk or in memory (see [`lifecycle`]).
//!
//! Every operation runs against that one repository. A client is `Send`
//! but not `Sync`; operations on one client are serialized by the borrow
//! checker, and concurrent work uses separate clients.
//!
//! # Example
//!
//! ```no_run
//! use vcs_client::{ClientOptions, GitClient};
//!
//! let client = GitClient::new(ClientOptions::new().path("/tmp/demo-repo"))?;
//! std::fs::write(client.work_dir().join("notes.txt"), "hello\n")?;
//! client.commit_all("add notes")?;
//! client.checkout_branch("feature")?;
//! assert_eq!(client.current_branch()?.as_str(), "refs/heads/feature");
//! client.dispose()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod lifecycle;

use std::path::Path;

use thiserror::Error;

use crate::auth::{AuthStrategy, AuthType};
use crate::core::config::{ClientConfig, ClientOptions, ConfigError, ResetMode};
use crate::core::types::{BranchName, CommitRecord, Oid, RefName};
use crate::git::GitError;

pub use lifecycle::{Backend, RepositoryHandle};

/// Errors from client construction and operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The options were rejected before any repository was touched.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The repository or the engine failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// A configured client bound to one repository.
#[derive(Debug)]
pub struct GitClient {
    handle: RepositoryHandle,
    auth: AuthStrategy,
    config: ClientConfig,
}

impl GitClient {
    /// Build a client: validate `options`, then open, clone, or initialize
    /// the repository.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Config`] if the options are invalid
    /// - [`ClientError::Git`] if the repository cannot be established
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        Self::from_config(options.build()?)
    }

    /// Build a client from an already validated configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let auth = AuthStrategy::from_config(&config);
        let handle = lifecycle::establish(&config, &auth)?;
        tracing::debug!(
            path = %handle.path().display(),
            backend = %handle.backend(),
            auth = %auth.auth_type(),
            "client ready"
        );
        Ok(Self {
            handle,
            auth,
            config,
        })
    }

    /// Bind to the memory-backed repository registered at the configured
    /// path, without creating anything.
    ///
    /// `is_memory` is implied. A remote URL, if given, is used for push only.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Git`] with [`GitError::InvalidRepoPath`] if nothing
    ///   is registered at the path
    pub fn attach(options: ClientOptions) -> Result<Self, ClientError> {
        let config = options.memory().build()?;
        let auth = AuthStrategy::from_config(&config);
        let handle = lifecycle::attach(&config)?;
        Ok(Self {
            handle,
            auth,
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The live repository.
    pub fn repository(&self) -> &RepositoryHandle {
        &self.handle
    }

    /// The validated configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Canonical repository path.
    pub fn path(&self) -> &Path {
        self.config.path()
    }

    /// Where files are read and written for commits.
    pub fn work_dir(&self) -> &Path {
        self.handle.work_dir()
    }

    pub fn backend(&self) -> Backend {
        self.handle.backend()
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.config.remote_url()
    }

    pub fn auth_type(&self) -> AuthType {
        self.config.auth_type()
    }

    pub fn username(&self) -> Option<&str> {
        self.config.username()
    }

    pub fn private_key_path(&self) -> Option<&Path> {
        self.config.private_key_path()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Stage every change, including deletions and new files, and commit.
    pub fn commit_all(&self, message: &str) -> Result<Oid, ClientError> {
        Ok(self
            .handle
            .git()
            .commit_all(message, self.config.author())?)
    }

    /// Switch to `name`, creating the branch at HEAD if needed.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidName`] if `name` is not a valid branch name
    pub fn checkout_branch(&self, name: &str) -> Result<(), ClientError> {
        let branch = BranchName::new(name).map_err(GitError::from)?;
        Ok(self.handle.git().checkout_branch(&branch)?)
    }

    /// Fully-qualified ref HEAD points at, e.g. `refs/heads/main`.
    pub fn current_branch(&self) -> Result<RefName, ClientError> {
        Ok(self.handle.git().current_branch()?)
    }

    /// Push the current branch to the configured remote.
    pub fn push(&self) -> Result<(), ClientError> {
        Ok(self
            .handle
            .git()
            .push(self.config.remote_name(), &self.auth)?)
    }

    /// Reset to HEAD using the configured mode.
    pub fn reset(&self) -> Result<(), ClientError> {
        self.reset_with(self.config.reset_mode())
    }

    /// Reset to HEAD using `mode`.
    pub fn reset_with(&self, mode: ResetMode) -> Result<(), ClientError> {
        Ok(self.handle.git().reset(mode)?)
    }

    /// Commit history of the current branch, most recent first.
    pub fn logs(&self) -> Result<Vec<CommitRecord>, ClientError> {
        Ok(self.handle.git().logs()?)
    }

    /// Release the repository.
    ///
    /// Disk-backed: the directory at the path is deleted, and a failure is
    /// returned. Memory-backed: the registry entry is removed.
    pub fn dispose(self) -> Result<(), ClientError> {
        let registry = std::sync::Arc::clone(self.config.registry());
        Ok(lifecycle::dispose(self.handle, &registry)?)
    }
}
