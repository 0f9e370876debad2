//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands and describe the repository
//! the command runs against:
//! - `--path <dir>`: Repository path (required unless an option file sets it)
//! - `--remote-url <url>`: Remote to clone from and push to
//! - `--memory`: Use a transient, process-owned repository
//! - `--auth-type <none|http|ssh>` with `--username`, `--password`,
//!   `--private-key-path`
//! - `--reset-mode <soft|mixed|hard>`: Default for `reset`
//! - `--options <file>`: TOML option file, applied before the flags above
//! - `--debug`: Enable debug logging

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::ResetMode;

/// vcs - drive a Git repository through one configured client
#[derive(Parser, Debug)]
#[command(name = "vcs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository path
    #[arg(long, global = true, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Remote repository URL
    #[arg(long, global = true, value_name = "URL")]
    pub remote_url: Option<String>,

    /// Keep the repository in process-owned scratch storage
    #[arg(long, global = true)]
    pub memory: bool,

    /// Authentication type: none, http, or ssh
    #[arg(long, global = true, value_name = "TYPE")]
    pub auth_type: Option<String>,

    /// Username for http or ssh auth
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for http auth, or key passphrase for ssh auth
    #[arg(long, global = true, env = "VCS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Private key file for ssh auth
    #[arg(long, global = true, value_name = "FILE")]
    pub private_key_path: Option<PathBuf>,

    /// Default reset mode: soft, mixed, or hard
    #[arg(long, global = true, value_name = "MODE")]
    pub reset_mode: Option<String>,

    /// TOML option file
    #[arg(long, global = true, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open, clone, or initialize the repository and report it
    #[command(
        name = "open",
        long_about = "Open, clone, or initialize the repository.\n\n\
            An existing repository at --path is opened as is. Otherwise, with \
            --remote-url the remote is cloned into --path; without it an empty \
            repository is initialized there.",
        after_help = "\
EXAMPLES:
    # Initialize a fresh repository
    vcs --path ./work open

    # Clone over https with basic auth
    vcs --path ./work --remote-url https://example.com/app.git \\
        --auth-type http --username deploy --password \"$TOKEN\" open"
    )]
    Open,

    /// Stage every change and commit it
    #[command(name = "commit")]
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Switch to a branch, creating it at HEAD if needed
    #[command(name = "checkout")]
    Checkout {
        /// Branch name, without refs/heads/
        branch: String,
    },

    /// Print the fully-qualified current branch
    #[command(name = "branch")]
    Branch,

    /// Push the current branch to the remote
    #[command(name = "push")]
    Push,

    /// Reset the current branch to HEAD
    #[command(
        name = "reset",
        after_help = "\
MODES:
    soft    move the branch pointer only
    mixed   also reset the index (default)
    hard    also reset the working tree and delete untracked files"
    )]
    Reset {
        /// Override the configured reset mode
        #[arg(long)]
        mode: Option<ResetMode>,
    },

    /// Show the commit log, most recent first
    #[command(name = "log")]
    Log {
        /// Show at most this many commits
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Release the repository (deletes a disk repository's directory)
    #[command(name = "dispose")]
    Dispose {
        /// Confirm deletion of a disk-backed repository
        #[arg(long)]
        yes: bool,
    },
}
