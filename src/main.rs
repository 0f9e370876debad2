//! vcs binary entry point.

fn main() -> anyhow::Result<()> {
    vcs_client::cli::run()
}
