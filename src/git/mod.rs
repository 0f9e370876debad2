//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to the repository engine. No other
//! module imports `git2`; the client facade drives repositories through
//! [`Git`] and turns an [`AuthStrategy`](crate::auth::AuthStrategy) into
//! transport credentials through the private `credentials` bridge.
//!
//! # Responsibilities
//!
//! - Open, initialize, and clone repositories, with the git directory either
//!   inside the working tree or split from it
//! - Stage-all commits, branch checkout, reset, push
//! - Current branch and commit log queries

mod credentials;
mod interface;

pub use credentials::DEFAULT_SSH_USER;
pub use interface::{Git, GitError, FALLBACK_AUTHOR};
