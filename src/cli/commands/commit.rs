//! commit command - Stage every change and commit it

use crate::client::GitClient;
use anyhow::{Context as _, Result};

/// Commit all changes in the working tree.
pub fn commit(client: &GitClient, message: &str) -> Result<()> {
    let oid = client.commit_all(message).context("Failed to commit")?;
    let branch = client.current_branch()?;
    let label = branch
        .branch_name()
        .map(|b| b.to_string())
        .unwrap_or_else(|| branch.to_string());
    println!(
        "[{} {}] {}",
        label,
        oid.short(7),
        message.lines().next().unwrap_or("")
    );
    Ok(())
}
