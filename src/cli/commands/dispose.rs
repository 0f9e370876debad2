//! dispose command - Release the repository

use crate::client::GitClient;
use crate::core::config::ClientConfig;
use anyhow::{bail, Context as _, Result};

/// Check that disposing `config`'s repository was confirmed.
///
/// Deleting a disk repository requires `--yes`; memory repositories need
/// no confirmation.
pub fn confirm(config: &ClientConfig, yes: bool) -> Result<()> {
    if !config.is_memory() && !yes {
        bail!(
            "Refusing to delete '{}' without --yes",
            config.path().display()
        );
    }
    Ok(())
}

/// Dispose of the repository.
pub fn dispose(client: GitClient) -> Result<()> {
    let path = client.path().to_path_buf();
    client.dispose().context("Failed to dispose repository")?;
    println!("Disposed {}", path.display());
    Ok(())
}
