//! core
//!
//! Core domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid, RefName, CommitRecord
//! - [`config`] - Client options, validation, and option files
//! - [`paths`] - Path normalization for repository and key locations

pub mod config;
pub mod paths;
pub mod types;
