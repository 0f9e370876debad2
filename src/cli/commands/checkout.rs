//! checkout command - Switch to a branch, creating it if needed

use crate::client::GitClient;
use anyhow::{Context as _, Result};

/// Check out a branch.
pub fn checkout(client: &GitClient, branch: &str) -> Result<()> {
    client
        .checkout_branch(branch)
        .with_context(|| format!("Failed to check out '{branch}'"))?;
    println!("Switched to branch '{branch}'");
    Ok(())
}
