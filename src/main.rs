//! rustexpand CLI entry point
//!
//! Parses command-line arguments, runs the selected command, and renders
//! failures as user-friendly error messages with suggestions. Exactly one
//! error message is printed per failed invocation; nothing here panics the
//! process beyond a nonzero exit code.

use anyhow::Result;
use clap::Parser;
use rustexpand::cli;
use rustexpand::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
