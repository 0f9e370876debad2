//! cli
//!
//! Command-line interface for the client.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Assemble [`ClientOptions`] from the option file and flags
//! - Initialize logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Every invocation builds one [`GitClient`] and
//! runs one operation against it. A `--memory` repository lives only as
//! long as the process, so it starts empty on every invocation.
//!
//! [`GitClient`]: crate::client::GitClient

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use std::path::Path;

use anyhow::{Context as _, Result};
use toml::Value;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::config::schema::OptionsFile;
use crate::core::config::{ClientOptions, ConfigError};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let options = client_options(&cli)?;
    tracing::debug!(?options, "resolved client options");

    commands::dispatch(cli.command, options)
}

/// Install the global subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default = if debug { "vcs_client=debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Layer the option file under the command-line flags.
pub fn client_options(cli: &Cli) -> Result<ClientOptions> {
    let mut options = ClientOptions::new();

    if let Some(file) = OptionsFile::locate(cli.options.as_deref())? {
        tracing::debug!(source = ?file.source, "applying option file");
        file.apply(&mut options)?;
    }

    let flags: [(&str, Option<String>); 7] = [
        ("path", path_flag("path", cli.path.as_deref())?),
        ("remote_url", cli.remote_url.clone()),
        ("auth_type", cli.auth_type.clone()),
        ("username", cli.username.clone()),
        ("password", cli.password.clone()),
        (
            "private_key_path",
            path_flag("private_key_path", cli.private_key_path.as_deref())?,
        ),
        ("reset_mode", cli.reset_mode.clone()),
    ];
    for (name, value) in flags {
        if let Some(value) = value {
            options
                .set(name, &[Value::String(value)])
                .with_context(|| format!("Invalid --{}", name.replace('_', "-")))?;
        }
    }
    if cli.memory {
        options.set("is_memory", &[])?;
    }

    Ok(options)
}

/// A path flag as option text. Non-UTF-8 paths are rejected rather than
/// rewritten.
fn path_flag(option: &str, path: Option<&Path>) -> Result<Option<String>, ConfigError> {
    path.map(|p| {
        p.to_str()
            .map(String::from)
            .ok_or_else(|| ConfigError::UnsupportedType {
                option: option.to_string(),
                expected: "UTF-8 path",
                found: "non-UTF-8 path",
            })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn flags_become_options() {
        let cli = Cli::try_parse_from([
            "vcs",
            "--path",
            "/srv/repo",
            "--reset-mode",
            "hard",
            "--memory",
            "branch",
        ])
        .unwrap();
        let config = client_options(&cli).unwrap().build().unwrap();
        assert_eq!(config.path(), Path::new("/srv/repo"));
        assert!(config.is_memory());
        assert_eq!(config.reset_mode(), crate::core::config::ResetMode::Hard);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/tmp/repo-\xff");
        let cli = Cli::try_parse_from([
            OsStr::new("vcs"),
            OsStr::new("--path"),
            raw,
            OsStr::new("open"),
        ])
        .unwrap();

        let err = client_options(&cli).unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(
            config_err,
            ConfigError::UnsupportedType { option, .. } if option == "path"
        ));
    }
}
