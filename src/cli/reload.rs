//! The `reload` command.
//!
//! Replays the stored request for a cached expansion: same command string,
//! same working directory, same cache slot. Reload never fabricates a
//! computation context - an identifier with no stored request is an error
//! and spawns nothing.

use anyhow::{Result, bail};
use clap::Args;

use crate::cache::ExpansionCache;
use crate::config::Settings;
use crate::ident::VirtualId;
use crate::request::Request;

/// Re-run a previous expansion by identifier.
#[derive(Args, Debug)]
pub struct ReloadCommand {
    /// Identifier of the cached expansion, e.g.
    /// "rustexpand:[expanded-crate] demo" (the scheme prefix is optional).
    /// May be omitted when exactly one expansion is cached.
    pub id: Option<String>,
}

impl ReloadCommand {
    /// Resolve the identifier and replay its stored request.
    pub async fn execute(self, settings: &Settings, cache: &mut ExpansionCache) -> Result<()> {
        let id = match self.id {
            Some(input) => VirtualId::parse(&input)?,
            None => match cache.len() {
                0 => bail!("no cached expansions to reload"),
                1 => {
                    let (_, entry) = cache.entries().next().expect("len checked above");
                    entry.request.id.clone()
                }
                n => {
                    bail!("{n} expansions are cached; pass an identifier (see 'rustexpand list')")
                }
            },
        };

        super::run_request(Request::Reload(id), settings, cache).await
    }
}
