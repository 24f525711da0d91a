//! The `command` and `path` commands.
//!
//! Both run an arbitrary cargo-expand sub-command; the user types whatever
//! would follow `cargo expand` (e.g. `bar::foo` runs `cargo expand
//! bar::foo`). `command` resolves the working directory from a source file's
//! enclosing Cargo.toml; `path` takes the directory verbatim and skips
//! manifest resolution entirely.
//!
//! Missing inputs are prompted for on an interactive terminal; in
//! non-interactive use they must be passed as arguments.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cache::ExpansionCache;
use crate::config::Settings;
use crate::core::ExpandError;
use crate::request::Request;
use crate::validate;

const COMMAND_PROMPT: &str =
    "Enter a cargo expand command, example: 'bar::foo' runs 'cargo expand bar::foo':";
const PATH_PROMPT: &str = "Enter an absolute path where the command will run:";

/// Run an arbitrary cargo-expand sub-command against a resolved manifest
/// directory.
#[derive(Args, Debug)]
pub struct CommandCommand {
    /// The sub-command text (prompted for when omitted)
    pub text: Option<String>,

    /// Source file whose enclosing Cargo.toml determines the working
    /// directory
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl CommandCommand {
    /// Collect the command text, resolve the manifest directory, and run.
    pub async fn execute(self, settings: &Settings, cache: &mut ExpansionCache) -> Result<()> {
        let text = require_input(self.text, COMMAND_PROMPT, ExpandError::EmptyCommand).await?;
        let request = validate::custom_request(&text, None, self.file.as_deref(), cache)?;
        super::run_request(Request::Expand(request), settings, cache).await
    }
}

/// Run an arbitrary cargo-expand sub-command in an explicit directory.
#[derive(Args, Debug)]
pub struct PathCommand {
    /// The sub-command text (prompted for when omitted)
    pub text: Option<String>,

    /// Directory to run in, bypassing manifest resolution (prompted for
    /// when omitted)
    pub dir: Option<PathBuf>,
}

impl PathCommand {
    /// Collect the command text and directory, validate both, and run.
    pub async fn execute(self, settings: &Settings, cache: &mut ExpansionCache) -> Result<()> {
        let text = require_input(self.text, COMMAND_PROMPT, ExpandError::EmptyCommand).await?;
        let dir_input = match self.dir {
            Some(dir) => dir.display().to_string(),
            None => {
                require_input(
                    None,
                    PATH_PROMPT,
                    ExpandError::InvalidPath {
                        path: String::new(),
                    },
                )
                .await?
            }
        };
        let dir = validate::directory(&dir_input)?;

        let request = validate::custom_request(&text, Some(&dir), None, cache)?;
        super::run_request(Request::Expand(request), settings, cache).await
    }
}

/// Return the given value, or prompt for one on a TTY; `missing` is the
/// error when neither yields anything.
async fn require_input(
    value: Option<String>,
    prompt: &str,
    missing: ExpandError,
) -> Result<String> {
    if let Some(value) = value {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(missing.into());
        }
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        return Err(missing.into());
    }

    print!("{} ", prompt.green());
    io::stdout().flush()?;

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let line = line.trim().to_string();
    if line.is_empty() {
        return Err(missing.into());
    }
    Ok(line)
}
