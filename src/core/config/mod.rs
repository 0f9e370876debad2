//! core::config
//!
//! Client configuration: named options in, one validated [`ClientConfig`] out.
//!
//! # Overview
//!
//! Options can be supplied two ways, and both land in the same
//! [`ClientOptions`] builder:
//!
//! - Typed builder methods (`.path(..)`, `.auth_type(..)`, ...)
//! - Named dynamic options via [`ClientOptions::set`], which is what option
//!   files and the command line feed. This layer checks argument counts and
//!   value kinds.
//!
//! Nothing is validated until [`ClientOptions::build`], which checks the
//! auth/credential combination, makes the path absolute, and never touches
//! disk or network.
//!
//! # Precedence
//!
//! Later settings override earlier ones:
//! 1. Default values
//! 2. Option file (see [`schema`])
//! 3. Command-line flags
//!
//! # Example
//!
//! ```
//! use vcs_client::auth::AuthType;
//! use vcs_client::core::config::ClientOptions;
//!
//! let config = ClientOptions::new()
//!     .path("/srv/repos/app")
//!     .remote_url("https://example.com/app.git")
//!     .auth_type(AuthType::Http)
//!     .username("deploy")
//!     .password("s3cret")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.auth_type(), AuthType::Http);
//! assert_eq!(config.username(), Some("deploy"));
//! ```

pub mod schema;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthType;
use crate::core::paths;
use crate::registry::MemoryRegistry;

/// Remote used for push when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// Errors from configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An option was given the wrong number of arguments.
    #[error("invalid arguments length for option '{option}': expected {expected}, got {actual}")]
    InvalidArgsLength {
        option: String,
        expected: &'static str,
        actual: usize,
    },

    /// An option was given a value of a kind it cannot accept.
    #[error("unsupported type for option '{option}': expected {expected}, got {found}")]
    UnsupportedType {
        option: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Auth type outside the recognized set.
    #[error("invalid auth type '{0}', must be one of: none, http, ssh")]
    InvalidAuthType(String),

    /// Options are individually fine but inconsistent together.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The repository path is missing or unusable.
    #[error("invalid repo path '{}': {reason}", .path.display())]
    InvalidRepoPath { path: PathBuf, reason: String },

    #[error("failed to read options file '{}': {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse options file '{}': {message}", .path.display())]
    ParseError { path: PathBuf, message: String },
}

/// How far a reset reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetMode {
    /// Move the branch pointer only.
    Soft,
    /// Also reset the index.
    #[default]
    Mixed,
    /// Also force the working tree to match.
    Hard,
}

impl ResetMode {
    /// The canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetMode::Soft => "soft",
            ResetMode::Mixed => "mixed",
            ResetMode::Hard => "hard",
        }
    }
}

impl fmt::Display for ResetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResetMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "soft" => Ok(ResetMode::Soft),
            "mixed" => Ok(ResetMode::Mixed),
            "hard" => Ok(ResetMode::Hard),
            _ => Err(ConfigError::InvalidOptions(format!(
                "unknown reset mode '{s}', must be one of: soft, mixed, hard"
            ))),
        }
    }
}

/// Mutable option set, validated once by [`ClientOptions::build`].
#[derive(Clone, Default)]
pub struct ClientOptions {
    path: Option<PathBuf>,
    remote_url: Option<String>,
    is_memory: bool,
    auth_type: AuthType,
    username: Option<String>,
    password: Option<String>,
    private_key: Option<Vec<u8>>,
    private_key_path: Option<PathBuf>,
    reset_mode: ResetMode,
    remote_name: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    registry: Option<Arc<MemoryRegistry>>,
}

impl ClientOptions {
    /// Start from defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository location. For memory-backed clients this is only a
    /// registry key.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Keep the repository in transient process-owned storage.
    pub fn memory(mut self) -> Self {
        self.is_memory = true;
        self
    }

    pub fn auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// HTTP password, or the key passphrase for SSH.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// SSH private key by value (PEM text).
    pub fn private_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// SSH private key by path. A leading `~` is expanded.
    pub fn private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    pub fn reset_mode(mut self, mode: ResetMode) -> Self {
        self.reset_mode = mode;
        self
    }

    /// Remote used by push. Defaults to [`DEFAULT_REMOTE`].
    pub fn remote_name(mut self, name: impl Into<String>) -> Self {
        self.remote_name = Some(name.into());
        self
    }

    /// Commit identity. Both halves must be given together.
    pub fn author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self.author_email = Some(email.into());
        self
    }

    /// Use an explicit memory registry instead of the process-wide one.
    pub fn registry(mut self, registry: Arc<MemoryRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Apply one named option.
    ///
    /// Every option takes exactly one argument except `is_memory`, which
    /// takes none (meaning `true`) or one boolean.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidArgsLength`] on a wrong argument count
    /// - [`ConfigError::UnsupportedType`] on a value of the wrong kind
    /// - [`ConfigError::InvalidAuthType`] for an unknown `auth_type`
    /// - [`ConfigError::InvalidOptions`] for an unknown option name or reset mode
    ///
    /// # Example
    ///
    /// ```
    /// use vcs_client::core::config::{ClientOptions, ConfigError};
    /// use toml::Value;
    ///
    /// let mut options = ClientOptions::new();
    /// options.set("path", &[Value::from("/tmp/repo")]).unwrap();
    /// options.set("is_memory", &[]).unwrap();
    ///
    /// let err = options.set("username", &[]).unwrap_err();
    /// assert!(matches!(err, ConfigError::InvalidArgsLength { .. }));
    /// ```
    pub fn set(&mut self, name: &str, args: &[toml::Value]) -> Result<(), ConfigError> {
        match name {
            "is_memory" | "memory" => {
                self.is_memory = match args {
                    [] => true,
                    [value] => value.as_bool().ok_or_else(|| unsupported(name, "boolean", value))?,
                    _ => return Err(args_length(name, "0 or 1", args.len())),
                };
            }
            "path" => self.path = Some(PathBuf::from(single_string(name, args)?)),
            "remote_url" => self.remote_url = Some(single_string(name, args)?),
            "auth_type" => self.auth_type = single_string(name, args)?.parse()?,
            "username" => self.username = Some(single_string(name, args)?),
            "password" => self.password = Some(single_string(name, args)?),
            "private_key" => self.private_key = Some(single_string(name, args)?.into_bytes()),
            "private_key_path" => {
                self.private_key_path = Some(PathBuf::from(single_string(name, args)?))
            }
            "reset_mode" => self.reset_mode = single_string(name, args)?.parse()?,
            "remote_name" => self.remote_name = Some(single_string(name, args)?),
            "author_name" => self.author_name = Some(single_string(name, args)?),
            "author_email" => self.author_email = Some(single_string(name, args)?),
            _ => {
                return Err(ConfigError::InvalidOptions(format!(
                    "unknown option '{name}'"
                )))
            }
        }
        Ok(())
    }

    /// Validate and normalize into a [`ClientConfig`].
    ///
    /// Relative paths are resolved against the current directory.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base = std::env::current_dir().map_err(|e| ConfigError::InvalidRepoPath {
            path: self.path.clone().unwrap_or_default(),
            reason: format!("cannot determine current directory: {e}"),
        })?;
        self.build_in(&base)
    }

    /// Like [`build`](Self::build), resolving relative paths against `base`.
    pub fn build_in(self, base: &Path) -> Result<ClientConfig, ConfigError> {
        let raw_path = self.path.unwrap_or_default();
        if raw_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidRepoPath {
                path: raw_path,
                reason: "path is required".into(),
            });
        }
        let path = paths::absolutize(&raw_path, base);

        let username = self.username.filter(|s| !s.is_empty());
        let password = self.password.filter(|s| !s.is_empty());
        let private_key = self.private_key.filter(|k| !k.is_empty());
        let private_key_path = self
            .private_key_path
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| paths::expand_home(&p));

        match self.auth_type {
            AuthType::None => {}
            AuthType::Http => {
                if username.is_none() || password.is_none() {
                    return Err(ConfigError::InvalidOptions(
                        "http auth requires both username and password".into(),
                    ));
                }
            }
            AuthType::Ssh => match (&private_key, &private_key_path) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::InvalidOptions(
                        "ssh auth takes either private_key or private_key_path, not both".into(),
                    ))
                }
                (None, None) => {
                    return Err(ConfigError::InvalidOptions(
                        "ssh auth requires private_key or private_key_path".into(),
                    ))
                }
                _ => {}
            },
        }

        let private_key = private_key
            .map(String::from_utf8)
            .transpose()
            .map_err(|_| ConfigError::InvalidOptions("private_key must be UTF-8 PEM text".into()))?;

        let author = match (self.author_name, self.author_email) {
            (Some(name), Some(email)) => Some(Author { name, email }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidOptions(
                    "author_name and author_email must be given together".into(),
                ))
            }
        };

        Ok(ClientConfig {
            path,
            remote_url: self.remote_url.filter(|s| !s.is_empty()),
            is_memory: self.is_memory,
            auth_type: self.auth_type,
            username,
            password,
            private_key,
            private_key_path,
            reset_mode: self.reset_mode,
            remote_name: self
                .remote_name
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            author,
            registry: self.registry.unwrap_or_else(MemoryRegistry::global),
        })
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("path", &self.path)
            .field("remote_url", &self.remote_url)
            .field("is_memory", &self.is_memory)
            .field("auth_type", &self.auth_type)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("private_key_path", &self.private_key_path)
            .field("reset_mode", &self.reset_mode)
            .finish_non_exhaustive()
    }
}

fn args_length(option: &str, expected: &'static str, actual: usize) -> ConfigError {
    ConfigError::InvalidArgsLength {
        option: option.to_string(),
        expected,
        actual,
    }
}

fn unsupported(option: &str, expected: &'static str, value: &toml::Value) -> ConfigError {
    ConfigError::UnsupportedType {
        option: option.to_string(),
        expected,
        found: value.type_str(),
    }
}

fn single_string(option: &str, args: &[toml::Value]) -> Result<String, ConfigError> {
    match args {
        [toml::Value::String(s)] => Ok(s.clone()),
        [other] => Err(unsupported(option, "string", other)),
        _ => Err(args_length(option, "1", args.len())),
    }
}

/// Commit identity used by commit operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// A validated client configuration.
///
/// Invariants established by [`ClientOptions::build`]:
/// - `path` is absolute and normalized
/// - HTTP auth has a non-empty username and password
/// - SSH auth has exactly one key source
#[derive(Clone)]
pub struct ClientConfig {
    path: PathBuf,
    remote_url: Option<String>,
    is_memory: bool,
    auth_type: AuthType,
    username: Option<String>,
    password: Option<String>,
    private_key: Option<String>,
    private_key_path: Option<PathBuf>,
    reset_mode: ResetMode,
    remote_name: String,
    author: Option<Author>,
    registry: Arc<MemoryRegistry>,
}

impl ClientConfig {
    /// Absolute repository path (registry key for memory-backed clients).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Inline SSH key text.
    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }

    pub fn private_key_path(&self) -> Option<&Path> {
        self.private_key_path.as_deref()
    }

    pub fn reset_mode(&self) -> ResetMode {
        self.reset_mode
    }

    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    /// The registry memory-backed repositories are recorded in.
    pub fn registry(&self) -> &Arc<MemoryRegistry> {
        &self.registry
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("path", &self.path)
            .field("remote_url", &self.remote_url)
            .field("is_memory", &self.is_memory)
            .field("auth_type", &self.auth_type)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("private_key_path", &self.private_key_path)
            .field("reset_mode", &self.reset_mode)
            .field("remote_name", &self.remote_name)
            .field("author", &self.author)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    fn base() -> ClientOptions {
        ClientOptions::new().path("/work/repo")
    }

    mod build {
        use super::*;

        #[test]
        fn defaults() {
            let config = base().build().unwrap();
            assert_eq!(config.path(), Path::new("/work/repo"));
            assert_eq!(config.remote_url(), None);
            assert!(!config.is_memory());
            assert_eq!(config.auth_type(), AuthType::None);
            assert_eq!(config.reset_mode(), ResetMode::Mixed);
            assert_eq!(config.remote_name(), DEFAULT_REMOTE);
            assert!(config.author().is_none());
        }

        #[test]
        fn missing_path_rejected() {
            let err = ClientOptions::new().build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRepoPath { .. }));

            let err = ClientOptions::new().path("").build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRepoPath { .. }));
        }

        #[test]
        fn relative_path_made_absolute() {
            let config = ClientOptions::new()
                .path("./nested/../repo")
                .build_in(Path::new("/work"))
                .unwrap();
            assert_eq!(config.path(), Path::new("/work/repo"));
        }

        #[test]
        fn http_requires_username_and_password() {
            let err = base()
                .auth_type(AuthType::Http)
                .username("alice")
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptions(_)));

            let err = base()
                .auth_type(AuthType::Http)
                .username("")
                .password("pw")
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptions(_)));
        }

        #[test]
        fn ssh_requires_exactly_one_key_source() {
            let err = base().auth_type(AuthType::Ssh).build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptions(_)));

            let err = base()
                .auth_type(AuthType::Ssh)
                .private_key(b"key".to_vec())
                .private_key_path("/keys/id")
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptions(_)));

            assert!(base()
                .auth_type(AuthType::Ssh)
                .private_key_path("/keys/id")
                .build()
                .is_ok());
        }

        #[test]
        fn ssh_key_must_be_utf8() {
            let err = base()
                .auth_type(AuthType::Ssh)
                .private_key(vec![0xff, 0xfe, 0x00])
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptions(_)));
        }

        #[test]
        fn none_auth_keeps_credentials_readable() {
            let config = base().username("alice").build().unwrap();
            assert_eq!(config.auth_type(), AuthType::None);
            assert_eq!(config.username(), Some("alice"));
        }

        #[test]
        fn author_halves_go_together() {
            let mut options = base();
            options
                .set("author_name", &[Value::from("Ada")])
                .unwrap();
            let err = options.build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptions(_)));

            let config = base().author("Ada", "ada@example.com").build().unwrap();
            assert_eq!(config.author().unwrap().email, "ada@example.com");
        }

        #[test]
        fn empty_remote_url_is_unset() {
            let config = base().remote_url("").build().unwrap();
            assert_eq!(config.remote_url(), None);
        }

        #[test]
        fn explicit_registry_is_used() {
            let registry = Arc::new(MemoryRegistry::new());
            let config = base().registry(Arc::clone(&registry)).build().unwrap();
            assert!(Arc::ptr_eq(config.registry(), &registry));
        }

        #[test]
        fn debug_redacts_secrets() {
            let config = base()
                .auth_type(AuthType::Http)
                .username("alice")
                .password("topsecret")
                .build()
                .unwrap();
            let debug = format!("{:?}", config);
            assert!(debug.contains("alice"));
            assert!(!debug.contains("topsecret"));
        }
    }

    mod set {
        use super::*;

        #[test]
        fn applies_every_named_option() {
            let mut options = ClientOptions::new();
            options.set("path", &[Value::from("/srv/repo")]).unwrap();
            options
                .set("remote_url", &[Value::from("ssh://git@example.com/r.git")])
                .unwrap();
            options.set("is_memory", &[]).unwrap();
            options.set("auth_type", &[Value::from("ssh")]).unwrap();
            options.set("username", &[Value::from("git")]).unwrap();
            options.set("password", &[Value::from("phrase")]).unwrap();
            options
                .set("private_key_path", &[Value::from("/keys/id")])
                .unwrap();
            options.set("reset_mode", &[Value::from("hard")]).unwrap();
            options.set("remote_name", &[Value::from("upstream")]).unwrap();

            let config = options.build().unwrap();
            assert_eq!(config.path(), Path::new("/srv/repo"));
            assert!(config.is_memory());
            assert_eq!(config.auth_type(), AuthType::Ssh);
            assert_eq!(config.private_key_path(), Some(Path::new("/keys/id")));
            assert_eq!(config.reset_mode(), ResetMode::Hard);
            assert_eq!(config.remote_name(), "upstream");
        }

        #[test]
        fn is_memory_accepts_bool() {
            let mut options = base();
            options.set("is_memory", &[Value::Boolean(false)]).unwrap();
            assert!(!options.clone().build().unwrap().is_memory());

            let err = options
                .set("is_memory", &[Value::from("yes")])
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::UnsupportedType { found: "string", .. }
            ));
        }

        #[test]
        fn wrong_arg_count() {
            let mut options = ClientOptions::new();
            let err = options
                .set("path", &[Value::from("a"), Value::from("b")])
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidArgsLength { actual: 2, .. }
            ));

            let err = options
                .set("is_memory", &[Value::Boolean(true), Value::Boolean(true)])
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidArgsLength { .. }));
        }

        #[test]
        fn wrong_value_kind() {
            let mut options = ClientOptions::new();
            let err = options.set("path", &[Value::Integer(5)]).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::UnsupportedType {
                    expected: "string",
                    found: "integer",
                    ..
                }
            ));
        }

        #[test]
        fn unknown_auth_type() {
            let mut options = ClientOptions::new();
            let err = options
                .set("auth_type", &[Value::from("kerberos")])
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidAuthType(_)));
        }

        #[test]
        fn unknown_option_name() {
            let mut options = ClientOptions::new();
            let err = options.set("colour", &[Value::from("blue")]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptions(_)));
        }
    }

    #[test]
    fn reset_mode_parse() {
        assert_eq!("HARD".parse::<ResetMode>().unwrap(), ResetMode::Hard);
        assert_eq!("soft".parse::<ResetMode>().unwrap(), ResetMode::Soft);
        assert!("medium".parse::<ResetMode>().is_err());
    }
}
