//! Command-line interface for rustexpand.
//!
//! Each subcommand is a thin handler: validate the input into an
//! [`ExpandRequest`], hand it to the [`ExpansionProvider`], report where the
//! rendered document landed. The commands map 1:1 to the operations an
//! editor integration needs:
//!
//! - `expand` - expand the module containing a source file
//! - `crate` - expand the whole crate containing a source file
//! - `reload` - re-run a previous expansion by identifier
//! - `command` - run an arbitrary cargo-expand sub-command against the
//!   resolved manifest directory
//! - `path` - run an arbitrary sub-command against an explicit directory
//! - `refresh` - replay cached global expansions (editor on-save hook)
//! - `list` - show the cached expansions
//!
//! Dispatch is strictly sequential: one command runs to completion,
//! including its external process call, before the next is accepted. There
//! is no cancellation of a started expansion.

pub mod custom;
pub mod expand;
pub mod list;
pub mod refresh;
pub mod reload;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::ProgressBar;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::cache::{self, ExpansionCache};
use crate::config::Settings;
use crate::provider::{ExpansionProvider, Rendered};
use crate::request::Request;

/// Top-level CLI definition.
#[derive(Parser)]
#[command(
    name = "rustexpand",
    about = "Expand Rust macros with cargo-expand and browse the results",
    version,
    long_about = "rustexpand shells out to cargo-expand and stores what it prints as cached, \
                  reloadable documents. Run it directly or wire it into an editor."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors. Mutually exclusive with --verbose.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the settings file (default: ~/.rustexpand/config.toml).
    #[arg(short, long, global = true, env = "RUSTEXPAND_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for cached expansions (default: ~/.rustexpand/cache).
    #[arg(long, global = true, env = "RUSTEXPAND_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Expand macros in the module containing a source file.
    ///
    /// The module path is derived from the file's location under the
    /// enclosing Cargo.toml; crate roots (src/main.rs, src/lib.rs) fall back
    /// to whole-crate scope.
    Expand(expand::ExpandCommand),

    /// Expand macros in the whole crate containing a source file.
    ///
    /// The result is labeled with the crate name declared in Cargo.toml.
    Crate(expand::CrateCommand),

    /// Re-run a previous expansion with its original command and directory.
    Reload(reload::ReloadCommand),

    /// Run an arbitrary cargo-expand sub-command.
    ///
    /// The working directory is resolved from a source file's enclosing
    /// Cargo.toml. Prompts for the command text when omitted.
    Command(custom::CommandCommand),

    /// Run an arbitrary cargo-expand sub-command in an explicit directory.
    ///
    /// Bypasses manifest resolution entirely. Prompts for missing inputs.
    Path(custom::PathCommand),

    /// Replay cached global (crate-wide and custom) expansions.
    ///
    /// Intended as an editor on-save hook; with --file, also refreshes the
    /// per-module expansion of that file if one is cached.
    Refresh(refresh::RefreshCommand),

    /// List the cached expansions.
    List(list::ListCommand),
}

impl Cli {
    /// Execute the selected command.
    ///
    /// Wires the shared components explicitly - settings, cache, provider -
    /// and passes them down by reference.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let settings = Settings::load_with_optional(self.config)?;
        let cache_root = cache::cache_dir_with_optional(self.cache_dir)?;
        let mut cache = ExpansionCache::load(&cache_root)?;

        match self.command {
            Commands::Expand(cmd) => cmd.execute(&settings, &mut cache).await,
            Commands::Crate(cmd) => cmd.execute(&settings, &mut cache).await,
            Commands::Reload(cmd) => cmd.execute(&settings, &mut cache).await,
            Commands::Command(cmd) => cmd.execute(&settings, &mut cache).await,
            Commands::Path(cmd) => cmd.execute(&settings, &mut cache).await,
            Commands::Refresh(cmd) => cmd.execute(&settings, &mut cache).await,
            Commands::List(cmd) => cmd.execute(&cache),
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run a validated request through the provider and report the result.
pub(crate) async fn run_request(
    request: Request,
    settings: &Settings,
    cache: &mut ExpansionCache,
) -> Result<()> {
    let message = match &request {
        Request::Expand(request) => format!("Running {}", request.command),
        Request::Reload(id) => format!("Reloading {}", id.uri()),
    };
    let spinner = expansion_spinner(&message);
    let mut provider = ExpansionProvider::new(cache, settings);
    let result = provider.provide_request(&request).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    report(&result?, settings);
    Ok(())
}

/// Print the outcome of a provide call.
pub(crate) fn report(rendered: &Rendered, settings: &Settings) {
    println!(
        "{} {} {} {}",
        "Expanded".green().bold(),
        rendered.id.label(),
        "->".dimmed(),
        rendered.file.display()
    );

    if !rendered.tool_succeeded {
        eprintln!(
            "{} the expansion tool exited with an error; its output was captured",
            "Note:".yellow().bold()
        );
    }

    if settings.notify_warnings {
        if let Some(warnings) = &rendered.warnings {
            eprintln!("{} expansion completed with warnings", "Note:".yellow().bold());
            // When warnings are already rendered into the document there is
            // no need to repeat them here.
            if !settings.display_warnings {
                eprintln!("{}", warnings.trim_end());
            }
        }
    }
}

/// A steady-tick spinner while the external tool runs, or `None` when stderr
/// is not a terminal.
fn expansion_spinner(message: &str) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() || std::env::var_os("RUSTEXPAND_NO_PROGRESS").is_some() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
