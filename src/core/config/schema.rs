//! core::config::schema
//!
//! Option files: TOML documents whose top-level keys are option names.
//!
//! # Location
//!
//! Searched in order:
//! 1. An explicit path (the `--options` flag)
//! 2. `$VCS_CLIENT_OPTIONS` if set
//!
//! No file is loaded otherwise; a missing file is only an error when it
//! was asked for explicitly.
//!
//! # Format
//!
//! ```toml
//! path = "/srv/repos/app"
//! remote_url = "git@example.com:team/app.git"
//! is_memory = false
//! auth_type = "ssh"
//! username = "git"
//! private_key_path = "~/.ssh/id_ed25519"
//! reset_mode = "hard"
//! ```
//!
//! A scalar value is passed as a single argument to
//! [`ClientOptions::set`]; an array is passed as the argument list, so
//! `is_memory = []` is the bare flag.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ClientOptions, ConfigError};

/// Environment variable naming a default option file.
pub const OPTIONS_ENV: &str = "VCS_CLIENT_OPTIONS";

/// A parsed option file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsFile {
    /// Where the file was read from.
    pub source: Option<PathBuf>,
    entries: toml::Table,
}

impl OptionsFile {
    /// Locate and load the option file, if any.
    ///
    /// # Errors
    ///
    /// Fails if an explicit file is missing, or if any located file cannot
    /// be read or parsed.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }

        if let Some(path) = std::env::var_os(OPTIONS_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load(&path).map(Some);
            }
        }

        Ok(None)
    }

    /// Read and parse an option file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut file = Self::parse(&contents).map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            message,
        })?;
        file.source = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parse option-file text.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let entries: toml::Table = toml::from_str(contents).map_err(|e| e.to_string())?;
        Ok(Self {
            source: None,
            entries,
        })
    }

    /// Apply every entry to `options`.
    ///
    /// Stops at the first entry that [`ClientOptions::set`] rejects.
    pub fn apply(&self, options: &mut ClientOptions) -> Result<(), ConfigError> {
        for (name, value) in &self.entries {
            match value {
                toml::Value::Array(args) => options.set(name, args)?,
                scalar => options.set(name, std::slice::from_ref(scalar))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthType;
    use crate::core::config::ResetMode;

    #[test]
    fn applies_scalars_and_flag_arrays() {
        let file = OptionsFile::parse(
            r#"
            path = "/srv/app"
            is_memory = []
            auth_type = "http"
            username = "deploy"
            password = "pw"
            reset_mode = "soft"
            "#,
        )
        .unwrap();

        let mut options = ClientOptions::new();
        file.apply(&mut options).unwrap();
        let config = options.build().unwrap();

        assert_eq!(config.path(), Path::new("/srv/app"));
        assert!(config.is_memory());
        assert_eq!(config.auth_type(), AuthType::Http);
        assert_eq!(config.reset_mode(), ResetMode::Soft);
    }

    #[test]
    fn array_with_too_many_args() {
        let file = OptionsFile::parse(r#"path = ["/a", "/b"]"#).unwrap();
        let err = file.apply(&mut ClientOptions::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgsLength { actual: 2, .. }));
    }

    #[test]
    fn wrong_kind_is_unsupported_type() {
        let file = OptionsFile::parse("username = 42").unwrap();
        let err = file.apply(&mut ClientOptions::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedType { .. }));
    }

    #[test]
    fn unknown_key_rejected() {
        let file = OptionsFile::parse(r#"trunk = "main""#).unwrap();
        let err = file.apply(&mut ClientOptions::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOptions(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("options.toml");
        fs::write(&path, "path = ").unwrap();

        let err = OptionsFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn explicit_missing_file_is_read_error() {
        let err = OptionsFile::locate(Some(Path::new("/nonexistent/options.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn load_records_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("options.toml");
        fs::write(&path, "path = \"/srv/app\"\n").unwrap();

        let file = OptionsFile::load(&path).unwrap();
        assert_eq!(file.source.as_deref(), Some(path.as_path()));
    }
}
