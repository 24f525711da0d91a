//! The `list` command.
//!
//! Shows the cached expansions: identifier, originating command and
//! directory, and when each slot was last written.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cache::ExpansionCache;

/// List the cached expansions.
#[derive(Args, Debug)]
pub struct ListCommand {}

impl ListCommand {
    /// Print one block per cache entry, ordered by identifier.
    pub fn execute(self, cache: &ExpansionCache) -> Result<()> {
        if cache.is_empty() {
            println!("No cached expansions");
            return Ok(());
        }

        println!(
            "{} ({} cached)",
            "Cached expansions".bold(),
            cache.len()
        );
        for (uri, entry) in cache.entries() {
            println!("  {}", uri.cyan());
            println!(
                "    {} {} (in {})",
                "runs".dimmed(),
                entry.request.command,
                entry.request.manifest_dir.display()
            );
            println!(
                "    {} {} {}",
                "last".dimmed(),
                entry.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                if entry.request.global { "[global]".yellow() } else { "".normal() }
            );
        }
        Ok(())
    }
}
