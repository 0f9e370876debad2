//! push command - Push the current branch

use crate::client::GitClient;
use anyhow::{Context as _, Result};

/// Push the current branch to the configured remote.
pub fn push(client: &GitClient) -> Result<()> {
    let branch = client.current_branch()?;
    client.push().context("Failed to push")?;
    println!("Pushed {branch} to {}", client.config().remote_name());
    Ok(())
}
