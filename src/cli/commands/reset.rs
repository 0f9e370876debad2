//! reset command - Reset the current branch to HEAD

use crate::client::GitClient;
use crate::core::config::ResetMode;
use anyhow::{Context as _, Result};

/// Reset to HEAD, with `mode` overriding the configured default.
pub fn reset(client: &GitClient, mode: Option<ResetMode>) -> Result<()> {
    let mode = mode.unwrap_or_else(|| client.config().reset_mode());
    client.reset_with(mode).context("Failed to reset")?;
    println!("Reset ({mode}) to HEAD");
    Ok(())
}
