//! Error handling for rustexpand
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`ExpandError`]) so callers and tests can
//!    distinguish failure causes without re-deriving them from message text.
//! 2. **User-friendly reporting** ([`ErrorContext`]) with actionable
//!    suggestions for CLI users.
//!
//! Every failed command surfaces exactly one message via
//! [`user_friendly_error`]; nothing in this crate is fatal to the host
//! process beyond a nonzero exit code.
//!
//! Note that a failing `cargo expand` run is deliberately *not* an error:
//! whatever the tool printed is rendered as the document body. Only
//! environment problems (missing binary, unreadable manifest, bad input)
//! surface through this module.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for rustexpand operations.
///
/// Variants map to the failure taxonomy of the tool:
/// - **Resolution errors**: [`ManifestNotFound`], [`ManifestParseError`],
///   [`CrateNameMissing`]
/// - **Input/environment errors**: [`FileNotFound`], [`NotRustFile`],
///   [`VirtualDocument`], [`EmptyCommand`], [`InvalidPath`]
/// - **Cache errors**: [`ExpansionNotFound`], [`CacheError`]
/// - **Tool errors**: [`CargoNotFound`], [`CargoExpandMissing`],
///   [`CommandFailed`]
///
/// [`ManifestNotFound`]: ExpandError::ManifestNotFound
/// [`ManifestParseError`]: ExpandError::ManifestParseError
/// [`CrateNameMissing`]: ExpandError::CrateNameMissing
/// [`FileNotFound`]: ExpandError::FileNotFound
/// [`NotRustFile`]: ExpandError::NotRustFile
/// [`VirtualDocument`]: ExpandError::VirtualDocument
/// [`EmptyCommand`]: ExpandError::EmptyCommand
/// [`InvalidPath`]: ExpandError::InvalidPath
/// [`ExpansionNotFound`]: ExpandError::ExpansionNotFound
/// [`CacheError`]: ExpandError::CacheError
/// [`CargoNotFound`]: ExpandError::CargoNotFound
/// [`CargoExpandMissing`]: ExpandError::CargoExpandMissing
/// [`CommandFailed`]: ExpandError::CommandFailed
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExpandError {
    /// No `Cargo.toml` in the starting directory or any ancestor
    #[error("Cargo.toml not found in {start} or any parent directory")]
    ManifestNotFound {
        /// The directory the upward search started from
        start: String,
    },

    /// The manifest exists but is not valid TOML
    #[error("Could not parse {path}: {reason}")]
    ManifestParseError {
        /// Path to the offending Cargo.toml
        path: String,
        /// The parser's diagnostic
        reason: String,
    },

    /// The manifest parsed but has no `[package] name`
    #[error("Could not read the crate name from {path}")]
    CrateNameMissing {
        /// Path to the offending Cargo.toml
        path: String,
    },

    /// The input file does not exist
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was requested
        path: String,
    },

    /// The input file is not a Rust source file
    #[error("Not a Rust source file: {path}")]
    NotRustFile {
        /// The path that was requested
        path: String,
    },

    /// The input file is itself a rendered expansion
    #[error("{path} is rendered expansion output, not a source file")]
    VirtualDocument {
        /// The path or identifier that was requested
        path: String,
    },

    /// Custom command text was empty
    #[error("The expand command must not be empty")]
    EmptyCommand,

    /// A user-supplied directory does not exist
    #[error("Not a valid directory: {path}")]
    InvalidPath {
        /// The directory that was requested
        path: String,
    },

    /// Reload/refresh asked for an identifier with no stored request
    #[error("No cached expansion for {id}")]
    ExpansionNotFound {
        /// The identifier URI that was requested
        id: String,
    },

    /// Reload target carries a scheme other than `rustexpand`
    #[error("{id} is not a rustexpand document")]
    SchemeMismatch {
        /// The identifier that was requested
        id: String,
    },

    /// The expansion cache index could not be read or written
    #[error("Expansion cache error: {reason}")]
    CacheError {
        /// What went wrong with the cache
        reason: String,
    },

    /// `cargo` is not on the PATH
    #[error("cargo is not installed or not found in PATH")]
    CargoNotFound,

    /// `cargo` exists but the `expand` subcommand does not
    #[error("the cargo-expand subcommand is not installed")]
    CargoExpandMissing,

    /// The external command could not be spawned or awaited
    #[error("Failed to run '{command}': {reason}")]
    CommandFailed {
        /// The full command line that failed
        command: String,
        /// The underlying spawn/wait failure
        reason: String,
    },

    /// I/O errors from [`std::io::Error`]
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing errors from [`toml::de::Error`]
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Wrapper adding a user-facing suggestion and optional details to an error.
///
/// Built by [`user_friendly_error`], displayed once by `main`.
///
/// # Examples
///
/// ```rust
/// use rustexpand::core::{ErrorContext, ExpandError};
///
/// let ctx = ErrorContext::new(anyhow::Error::from(ExpandError::CargoExpandMissing))
///     .with_suggestion("Install it with: cargo install cargo-expand");
/// let message = format!("{ctx}");
/// assert!(message.contains("cargo-expand"));
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// A suggested next step for the user
    pub suggestion: Option<String>,
    /// Extra background shown after the suggestion
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggested next step.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach background details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.error);
        if let Some(ref suggestion) = self.suggestion {
            eprintln!("  {} {}", "Hint:".yellow().bold(), suggestion);
        }
        if let Some(ref details) = self.details {
            eprintln!("  {details}");
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  Hint: {suggestion}")?;
        }
        if let Some(ref details) = self.details {
            write!(f, "\n  {details}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a contextual suggestion.
///
/// Downcasts to [`ExpandError`] where possible and picks a next step matched
/// to the failure class; other errors pass through without a suggestion.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<ExpandError>() {
        Some(ExpandError::ManifestNotFound { .. }) => Some(
            "Run from inside a cargo project, or use 'rustexpand path <command> <dir>' \
             to point at a project directory explicitly"
                .to_string(),
        ),
        Some(ExpandError::CrateNameMissing { path }) => Some(format!(
            "Add a [package] section with a name to {path}, or expand a single module instead"
        )),
        Some(ExpandError::ManifestParseError { .. }) => {
            Some("Fix the TOML syntax and try again".to_string())
        }
        Some(ExpandError::NotRustFile { .. }) => {
            Some("rustexpand only expands .rs files".to_string())
        }
        Some(ExpandError::VirtualDocument { .. }) => Some(
            "Use 'rustexpand reload' to re-run the expansion that produced this file".to_string(),
        ),
        Some(ExpandError::ExpansionNotFound { .. } | ExpandError::SchemeMismatch { .. }) => {
            Some("Run 'rustexpand list' to see the cached expansions".to_string())
        }
        Some(ExpandError::EmptyCommand) => Some(
            "Pass a cargo-expand sub-command, e.g. 'bar::foo' to run 'cargo expand bar::foo'"
                .to_string(),
        ),
        Some(ExpandError::InvalidPath { .. }) => {
            Some("Pass an absolute path to an existing directory".to_string())
        }
        Some(ExpandError::CargoNotFound) => {
            Some("Install Rust from https://rustup.rs and ensure cargo is in PATH".to_string())
        }
        Some(ExpandError::CargoExpandMissing) => {
            Some("Install it with: cargo install cargo-expand".to_string())
        }
        _ => None,
    };

    let ctx = ErrorContext::new(error);
    match suggestion {
        Some(s) => ctx.with_suggestion(s),
        None => ctx,
    }
}
