//! auth
//!
//! Authentication strategy resolution.
//!
//! # Overview
//!
//! A client's credential fields (auth type, username, password, key by
//! value or by path) are resolved once into an immutable [`AuthStrategy`]:
//!
//! - [`AuthStrategy::None`] - anonymous transport
//! - [`AuthStrategy::HttpBasic`] - username and password
//! - [`AuthStrategy::SshKey`] - a private key, inline or on disk
//!
//! Resolution is pure. Invalid combinations are rejected earlier, when the
//! configuration is built (see [`crate::core::config`]).
//!
//! # Security
//!
//! Secrets never appear in `Debug` output, log events, or error messages.

mod strategy;

pub use strategy::{AuthStrategy, AuthType, KeySource};
