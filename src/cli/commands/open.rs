//! open command - Open, clone, or initialize the repository

use crate::client::GitClient;
use anyhow::Result;

/// Report the repository the client is bound to.
pub fn open(client: &GitClient) -> Result<()> {
    println!("path:     {}", client.path().display());
    println!("backend:  {}", client.backend());
    if let Some(url) = client.remote_url() {
        println!("remote:   {url}");
    }
    println!("auth:     {}", client.auth_type());
    match client.current_branch() {
        Ok(branch) => println!("branch:   {branch}"),
        Err(e) => println!("branch:   ({e})"),
    }
    Ok(())
}
