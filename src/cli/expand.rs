//! The `expand` and `crate` commands.
//!
//! Both take a Rust source file, resolve its enclosing Cargo.toml, and run
//! `cargo expand` there. They differ only in scope: `expand` derives a
//! module path from the file's location (falling back to whole-crate scope
//! for crate roots), `crate` always expands the whole crate and labels the
//! result with the crate's declared name.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cache::ExpansionCache;
use crate::config::Settings;
use crate::request::Request;
use crate::validate;

/// Expand the module containing a source file.
#[derive(Args, Debug)]
pub struct ExpandCommand {
    /// Rust source file to expand
    pub file: PathBuf,
}

impl ExpandCommand {
    /// Validate the file, derive the module path, and run the expansion.
    pub async fn execute(self, settings: &Settings, cache: &mut ExpansionCache) -> Result<()> {
        let request = validate::expand_request(&self.file, false, cache)?;
        super::run_request(Request::Expand(request), settings, cache).await
    }
}

/// Expand the whole crate containing a source file.
#[derive(Args, Debug)]
pub struct CrateCommand {
    /// Rust source file inside the crate to expand
    pub file: PathBuf,
}

impl CrateCommand {
    /// Validate the file, read the crate name, and run the expansion.
    pub async fn execute(self, settings: &Settings, cache: &mut ExpansionCache) -> Result<()> {
        let request = validate::expand_request(&self.file, true, cache)?;
        super::run_request(Request::Expand(request), settings, cache).await
    }
}
