//! vcs-client - a configurable Git client facade
//!
//! A [`GitClient`] is built from named options (path, remote URL, backend,
//! credentials, reset mode), binds to one repository on disk or in memory,
//! and exposes a small set of operations: commit everything, check out a
//! branch, query the current branch, push, reset, read the log, dispose.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface (`vcs` binary)
//! - [`client`] - The facade: construction, lifecycle, operations
//! - [`core`] - Domain types, configuration, path normalization
//! - [`auth`] - Authentication strategy resolution
//! - [`git`] - Single interface for all Git operations
//! - [`registry`] - Process-wide table of memory-backed repositories
//!
//! # Correctness Invariants
//!
//! 1. A constructed client always holds a live repository
//! 2. Invalid option combinations fail before any disk or network access
//! 3. A memory-backed repository is registered before its client is returned
//! 4. Secrets never appear in `Debug` output, log events, or errors

pub mod auth;
pub mod cli;
pub mod client;
pub mod core;
pub mod git;
pub mod registry;

pub use auth::{AuthStrategy, AuthType};
pub use client::{Backend, ClientError, GitClient};
pub use crate::core::config::{ClientConfig, ClientOptions, ConfigError, ResetMode};
pub use crate::core::types::{BranchName, CommitRecord, Oid, RefName};
pub use git::GitError;
pub use registry::MemoryRegistry;
