//! branch command - Print the current branch

use crate::client::GitClient;
use anyhow::Result;

/// Print the fully-qualified ref HEAD points at.
pub fn branch(client: &GitClient) -> Result<()> {
    println!("{}", client.current_branch()?);
    Ok(())
}
