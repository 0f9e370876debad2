//! core::paths
//!
//! Path normalization for repository locations and key files.
//!
//! Repository paths double as registry keys for memory-backed repositories,
//! so two spellings of the same location (`./repo`, `/work/repo/`,
//! `/work/x/../repo`) must normalize to one key. Normalization is lexical:
//! the path does not need to exist, and symlinks are not resolved.
//!
//! # Example
//!
//! ```
//! use vcs_client::core::paths::absolutize;
//! use std::path::{Path, PathBuf};
//!
//! let base = Path::new("/work");
//! assert_eq!(absolutize(Path::new("./a/../repo"), base), PathBuf::from("/work/repo"));
//! assert_eq!(absolutize(Path::new("/srv/repo/"), base), PathBuf::from("/srv/repo"));
//! ```

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `base` and fold `.` and `..` components.
///
/// `..` never climbs above the root.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() never removes the root
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a leading `~` (and `~user` forms) are returned unchanged,
/// as is everything when no home directory can be determined.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Check whether `path` is an existing directory with at least one entry.
///
/// Missing paths and read errors count as "not non-empty"; the caller
/// surfaces the real error when it goes on to use the path.
pub fn is_non_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
