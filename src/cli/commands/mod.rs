//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Builds a [`GitClient`] from the resolved options, after any
//!    confirmation the command needs
//! 2. Runs exactly one client operation
//! 3. Formats and displays output
//!
//! Handlers never touch the engine directly.

mod branch;
mod checkout;
mod commit;
mod dispose;
mod log_cmd;
mod open;
mod push;
mod reset;

pub use branch::branch;
pub use checkout::checkout;
pub use commit::commit;
pub use dispose::dispose;
pub use log_cmd::log;
pub use open::open;
pub use push::push;
pub use reset::reset;

use crate::cli::args::Command;
use crate::client::GitClient;
use crate::core::config::{ClientConfig, ClientOptions};
use anyhow::{Context as _, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, options: ClientOptions) -> Result<()> {
    let config = options.build().context("Invalid client options")?;
    if let Command::Dispose { yes } = command {
        // Refuse before connecting, which would create the repository
        dispose::confirm(&config, yes)?;
    }

    let client = connect(config)?;
    match command {
        Command::Open => open::open(&client),
        Command::Commit { message } => commit::commit(&client, &message),
        Command::Checkout { branch } => checkout::checkout(&client, &branch),
        Command::Branch => branch::branch(&client),
        Command::Push => push::push(&client),
        Command::Reset { mode } => reset::reset(&client, mode),
        Command::Log { limit, json } => log_cmd::log(&client, limit, json),
        Command::Dispose { .. } => dispose::dispose(client),
    }
}

/// Build the client every command runs against.
fn connect(config: ClientConfig) -> Result<GitClient> {
    GitClient::from_config(config).context("Failed to open repository")
}
