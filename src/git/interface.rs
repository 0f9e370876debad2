//! git::interface
//!
//! Git interface implementation using git2.
//!
//! The [`Git`] type is the only place the crate talks to libgit2. Every
//! repository mutation the client facade offers (commit, checkout, push,
//! reset) and every query (current branch, log) is a method here.
//!
//! # Error Handling
//!
//! Conditions the facade itself detects get named variants
//! ([`GitError::RepoAlreadyExists`], [`GitError::DetachedHead`], ...).
//! Everything libgit2 reports is carried unchanged in
//! [`GitError::Engine`], so callers see the engine's own diagnostic for
//! network failures, rejected credentials, or checkout conflicts.
//!
//! # Example
//!
//! ```ignore
//! use vcs_client::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("/srv/repo"))?;
//! git.commit_all("update", None)?;
//! println!("on {}", git.current_branch()?);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    BranchType, ErrorCode, FetchOptions, IndexAddOption, PushOptions, Repository, ResetType,
    Signature, Sort, StatusOptions,
};
use thiserror::Error;

use super::credentials;
use crate::auth::AuthStrategy;
use crate::core::config::{Author, ResetMode};
use crate::core::types::{BranchName, CommitRecord, Oid, RefName, TypeError};

/// Identity used for commits when neither the client nor the repository
/// configuration provides one.
pub const FALLBACK_AUTHOR: (&str, &str) = ("vcs-client", "vcs-client@localhost");

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at the given path.
    #[error("not a git repository: {}", .path.display())]
    NotARepo { path: PathBuf },

    /// A fresh clone was requested onto a non-empty target.
    #[error("repo already exists: {}", .path.display())]
    RepoAlreadyExists { path: PathBuf },

    /// The path cannot hold a repository.
    #[error("invalid repo path '{}': {reason}", .path.display())]
    InvalidRepoPath { path: PathBuf, reason: String },

    /// HEAD points at a commit, not a branch.
    #[error("HEAD is detached; not on any branch")]
    DetachedHead,

    /// The configured remote does not exist.
    #[error("remote not found: {name}")]
    RemoteNotFound { name: String },

    /// The remote refused a ref update.
    #[error("push of {refname} rejected: {message}")]
    PushRejected { refname: String, message: String },

    /// A name failed validation.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    /// Working tree filesystem error.
    #[error("filesystem error at '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Failure reported by libgit2, unchanged.
    #[error(transparent)]
    Engine(#[from] git2::Error),
}

impl GitError {
    fn io(path: &Path, source: io::Error) -> Self {
        GitError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The Git interface.
///
/// Wraps one `git2::Repository`. Not safe for concurrent use: the index
/// and working tree are mutated in place, so callers serialize operations
/// on one instance.
pub struct Git {
    repo: Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("git_dir", &self.repo.path())
            .field("work_dir", &self.repo.workdir())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Lifecycle
    // =========================================================================

    /// Open the repository whose working tree root is exactly `path`.
    ///
    /// Unlike discovery, parent directories are not searched.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` holds no repository
    pub fn open(path: &Path) -> Result<Self, GitError> {
        match Repository::open(path) {
            Ok(repo) => Ok(Self { repo }),
            Err(e) if e.code() == ErrorCode::NotFound => Err(GitError::NotARepo {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether `path` already holds a repository.
    pub fn exists_at(path: &Path) -> bool {
        Repository::open(path).is_ok()
    }

    /// Initialize an empty repository at `path`, creating directories.
    pub fn init(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::init(path)?;
        Ok(Self { repo })
    }

    /// Clone `url` into `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::RepoAlreadyExists`] if `path` is a non-empty directory
    /// - [`GitError::Engine`] for transport or authentication failures
    pub fn clone_repo(url: &str, path: &Path, auth: &AuthStrategy) -> Result<Self, GitError> {
        if crate::core::paths::is_non_empty_dir(path) {
            return Err(GitError::RepoAlreadyExists {
                path: path.to_path_buf(),
            });
        }

        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(credentials::remote_callbacks(auth));
        let repo = RepoBuilder::new().fetch_options(fetch).clone(url, path)?;
        Ok(Self { repo })
    }

    /// Initialize an empty repository whose git directory and working tree
    /// live in separate places.
    pub fn init_split(git_dir: &Path, work_dir: &Path) -> Result<Self, GitError> {
        let repo = Repository::init_bare(git_dir)?;
        Self::attach_work_dir(repo, work_dir)
    }

    /// Clone `url` with the git directory at `git_dir` and the working tree
    /// at `work_dir`.
    pub fn clone_split(
        url: &str,
        git_dir: &Path,
        work_dir: &Path,
        auth: &AuthStrategy,
    ) -> Result<Self, GitError> {
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(credentials::remote_callbacks(auth));
        let repo = RepoBuilder::new()
            .bare(true)
            .fetch_options(fetch)
            .clone(url, git_dir)?;

        let git = Self::attach_work_dir(repo, work_dir)?;
        if git.head_commit()?.is_some() {
            git.repo
                .checkout_head(Some(CheckoutBuilder::new().force()))?;
        }
        Ok(git)
    }

    /// Reopen a repository created by [`init_split`](Self::init_split) or
    /// [`clone_split`](Self::clone_split).
    pub fn open_split(git_dir: &Path, work_dir: &Path) -> Result<Self, GitError> {
        let repo = Repository::open_bare(git_dir)?;
        Self::attach_work_dir(repo, work_dir)
    }

    fn attach_work_dir(repo: Repository, work_dir: &Path) -> Result<Self, GitError> {
        repo.set_workdir(work_dir, false)?;
        Ok(Self { repo })
    }

    /// Root of the working tree.
    pub fn work_dir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// The underlying engine repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The commit HEAD points at, or `None` on an unborn branch.
    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>, GitError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The fully-qualified ref of the current branch.
    ///
    /// On an unborn branch this is the ref HEAD names.
    ///
    /// # Errors
    ///
    /// - [`GitError::DetachedHead`] if HEAD is not on a branch
    pub fn current_branch(&self) -> Result<RefName, GitError> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => {
                let name = head.name().ok_or_else(|| {
                    git2::Error::from_str("current branch name is not valid UTF-8")
                })?;
                Ok(RefName::new(name)?)
            }
            Ok(_) => Err(GitError::DetachedHead),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                let target = head.symbolic_target().ok_or(GitError::DetachedHead)?;
                Ok(RefName::new(target)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Walk the current branch's ancestry, most recent first.
    ///
    /// An unborn branch has an empty log.
    pub fn logs(&self) -> Result<Vec<CommitRecord>, GitError> {
        if self.head_commit()?.is_none() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        let mut records = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let author = commit.author();
            let timestamp = chrono::DateTime::from_timestamp(author.when().seconds(), 0)
                .unwrap_or(chrono::DateTime::UNIX_EPOCH);

            records.push(CommitRecord {
                hash: Oid::new(commit.id().to_string())?,
                author: author.name().unwrap_or("").to_string(),
                email: author.email().unwrap_or("").to_string(),
                message: commit.message().unwrap_or("").to_string(),
                timestamp,
            });
        }

        Ok(records)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Stage every change in the working tree, including new and deleted
    /// files, and commit it on the current branch.
    ///
    /// Empty commits are left to the engine, which accepts them.
    pub fn commit_all(&self, message: &str, author: Option<&Author>) -> Result<Oid, GitError> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.signature(author)?;
        let parent = self.head_commit()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        tracing::debug!(oid = %oid, "created commit");

        Ok(Oid::new(oid.to_string())?)
    }

    /// The commit identity: explicit author, then repository config, then
    /// [`FALLBACK_AUTHOR`].
    fn signature(&self, author: Option<&Author>) -> Result<Signature<'static>, GitError> {
        if let Some(author) = author {
            return Ok(Signature::now(&author.name, &author.email)?);
        }
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(_) => Ok(Signature::now(FALLBACK_AUTHOR.0, FALLBACK_AUTHOR.1)?),
        }
    }

    /// Switch to `branch`, creating it at HEAD if it does not exist.
    ///
    /// Checking out the current branch is a no-op.
    pub fn checkout_branch(&self, branch: &BranchName) -> Result<(), GitError> {
        let refname = RefName::for_branch(branch);
        if matches!(self.current_branch(), Ok(ref current) if *current == refname) {
            return Ok(());
        }

        match self.repo.find_branch(branch.as_str(), BranchType::Local) {
            Ok(existing) => {
                let commit = existing.get().peel_to_commit()?;
                self.repo
                    .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
                tracing::debug!(branch = %branch, "switched to existing branch");
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                // A new branch starts at HEAD, so the tree already matches
                if let Some(head) = self.head_commit()? {
                    self.repo.branch(branch.as_str(), &head, false)?;
                }
                tracing::debug!(branch = %branch, "created branch");
            }
            Err(e) => return Err(e.into()),
        }

        self.repo.set_head(refname.as_str())?;
        Ok(())
    }

    /// Push the current branch to the same name on `remote_name`.
    ///
    /// # Errors
    ///
    /// - [`GitError::RemoteNotFound`] if the remote is not configured
    /// - [`GitError::PushRejected`] if the remote refuses the update
    /// - [`GitError::Engine`] for transport or authentication failures
    pub fn push(&self, remote_name: &str, auth: &AuthStrategy) -> Result<(), GitError> {
        let branch = self.current_branch()?;
        let mut remote = match self.repo.find_remote(remote_name) {
            Ok(remote) => remote,
            Err(e) if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::InvalidSpec => {
                return Err(GitError::RemoteNotFound {
                    name: remote_name.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let refspec = format!("{branch}:{branch}");

        let mut rejection: Option<(String, String)> = None;
        {
            let mut callbacks = credentials::remote_callbacks(auth);
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejection = Some((refname.to_string(), message.to_string()));
                }
                Ok(())
            });
            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            remote.push(&[refspec.as_str()], Some(&mut options))?;
        }

        if let Some((refname, message)) = rejection {
            return Err(GitError::PushRejected { refname, message });
        }
        tracing::info!(remote = remote_name, branch = %branch, "pushed");
        Ok(())
    }

    /// Reset the current branch to HEAD.
    ///
    /// `Hard` additionally deletes untracked, non-ignored files under the
    /// working tree root.
    pub fn reset(&self, mode: ResetMode) -> Result<(), GitError> {
        match self.head_commit()? {
            Some(head) => {
                let kind = match mode {
                    ResetMode::Soft => ResetType::Soft,
                    ResetMode::Mixed => ResetType::Mixed,
                    ResetMode::Hard => ResetType::Hard,
                };
                let mut checkout = CheckoutBuilder::new();
                checkout.force();
                let checkout = (mode == ResetMode::Hard).then_some(&mut checkout);
                self.repo.reset(head.as_object(), kind, checkout)?;
            }
            None if mode == ResetMode::Soft => {}
            None => {
                // Nothing committed: the index resets to empty
                let mut index = self.repo.index()?;
                index.clear()?;
                index.write()?;
            }
        }

        if mode == ResetMode::Hard {
            self.remove_untracked()?;
        }
        tracing::debug!(%mode, "reset to HEAD");
        Ok(())
    }

    /// Delete untracked, non-ignored files and untracked nested
    /// repositories, then any directories emptied by that.
    fn remove_untracked(&self) -> Result<(), GitError> {
        let Some(work_dir) = self.repo.workdir() else {
            return Ok(());
        };

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let untracked: Vec<PathBuf> = self
            .repo
            .statuses(Some(&mut options))?
            .iter()
            .filter(|entry| entry.status().is_wt_new())
            .filter_map(|entry| entry.path().map(|p| work_dir.join(p)))
            .collect();

        for path in &untracked {
            // An untracked nested repository is reported as one directory entry
            let is_dir = fs::symlink_metadata(path)
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            let removed = if is_dir {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            match removed {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(GitError::io(path, e)),
            }
            prune_empty_parents(path, work_dir);
        }

        if !untracked.is_empty() {
            tracing::debug!(count = untracked.len(), "removed untracked files");
        }
        Ok(())
    }
}

/// Remove empty directories from `path`'s parent up to, not including, `root`.
fn prune_empty_parents(path: &Path, root: &Path) {
    let mut dir = path.parent();
    while let Some(current) = dir {
        if current == root || !current.starts_with(root) {
            break;
        }
        // remove_dir fails on non-empty directories, which ends the walk
        if fs::remove_dir(current).is_err() {
            break;
        }
        dir = current.parent();
    }
}
