//! log command - Show the commit log
//!
//! One line per commit, most recent first. `--json` prints the full
//! records instead.

use crate::client::GitClient;
use anyhow::{Context as _, Result};

/// Print the log of the current branch.
pub fn log(client: &GitClient, limit: Option<usize>, json: bool) -> Result<()> {
    let mut records = client.logs().context("Failed to read log")?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No commits yet.");
        return Ok(());
    }
    for record in &records {
        println!(
            "{} {} {:<16} {}",
            record.hash.short(7),
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.author,
            record.summary()
        );
    }
    Ok(())
}
