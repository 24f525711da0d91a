//! The `refresh` command.
//!
//! The editor-side on-save hook. Global expansions (crate-wide and custom)
//! are replayed unconditionally; the per-module expansion of the saved file
//! is replayed only when its slot already exists in the cache - saving a
//! file the user never expanded triggers nothing.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::cache::ExpansionCache;
use crate::config::Settings;
use crate::ident::VirtualId;
use crate::request::{ExpandRequest, Request};

/// Replay cached global expansions, plus the saved file's module expansion
/// when one exists.
#[derive(Args, Debug)]
pub struct RefreshCommand {
    /// The file that was saved; refreshes its per-module expansion too
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl RefreshCommand {
    /// Replay every eligible stored request, one at a time.
    pub async fn execute(self, settings: &Settings, cache: &mut ExpansionCache) -> Result<()> {
        if !settings.refresh_on_save {
            tracing::debug!(target: "refresh", "refresh_on_save is disabled; nothing to do");
            println!("{}", "Refresh on save is disabled in the settings".yellow());
            return Ok(());
        }

        let mut targets: Vec<ExpandRequest> = cache
            .entries()
            .filter(|(_, entry)| entry.request.global)
            .map(|(_, entry)| entry.request.clone())
            .collect();

        if let Some(file) = &self.file {
            let id = VirtualId::for_file(file);
            if let Some(entry) = cache.get(&id) {
                if !entry.request.global {
                    targets.push(entry.request.clone());
                }
            }
        }

        if targets.is_empty() {
            println!("{}", "Nothing to refresh".yellow());
            return Ok(());
        }

        // Sequential on purpose: one external process at a time.
        let count = targets.len();
        for request in targets {
            super::run_request(Request::Expand(request), settings, cache).await?;
        }

        println!(
            "{} {count} expansion{}",
            "Refreshed".green().bold(),
            if count == 1 { "" } else { "s" }
        );
        Ok(())
    }
}
