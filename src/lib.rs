//! rustexpand - a macro-expansion viewer built on `cargo expand`
//!
//! rustexpand shells out to [`cargo expand`](https://github.com/dtolnay/cargo-expand),
//! captures whatever the tool prints, and renders the result as a cached
//! document an editor (or the user) can open, reload, and refresh. It is a
//! thin front end: it does no parsing of the expanded output and no build
//! orchestration of its own.
//!
//! # Architecture Overview
//!
//! Every command follows the same pipeline:
//!
//! 1. **Validate** - check the input file or directory, locate the enclosing
//!    `Cargo.toml`, and build an [`request::ExpandRequest`] describing exactly
//!    what to run and where.
//! 2. **Provide** - the [`provider::ExpansionProvider`] executes the request,
//!    renders the captured output (optionally prefixed with the command,
//!    working directory, timestamp, and warnings), and stores it in the
//!    expansion cache keyed by the request's [`ident::VirtualId`].
//! 3. **Replay** - `reload` and `refresh` look up the stored request for an
//!    identifier and run it again, overwriting the same cache slot.
//!
//! The cache is persistent (`~/.rustexpand/cache` by default) so an editor
//! integration can reload an expansion produced by an earlier invocation.
//! Entries are overwritten in place and never evicted.
//!
//! # Core Modules
//!
//! - [`cli`] - command-line interface: `expand`, `crate`, `reload`,
//!   `command`, `path`, `refresh`, `list`
//! - [`validate`] - per-command validation and request construction
//! - [`manifest`] - upward `Cargo.toml` discovery and crate-name extraction
//! - [`ident`] - virtual identifiers and module-path derivation
//! - [`request`] - the request data model persisted for replay
//! - [`expand`] - `cargo expand` invocation with captured output
//! - [`cache`] - the persistent expansion store
//! - [`provider`] - the execute/render/store facade over the cache
//! - [`config`] - user settings (`~/.rustexpand/config.toml`)
//! - [`core`] - error types and user-facing error formatting
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Expand the module containing a file (falls back to the whole crate
//! # for crate roots like src/main.rs)
//! rustexpand expand src/inner/thing.rs
//!
//! # Expand the whole crate
//! rustexpand crate src/main.rs
//!
//! # Re-run a previous expansion with the exact same command and directory
//! rustexpand reload "rustexpand:[expanded-crate] demo"
//!
//! # Arbitrary cargo-expand sub-commands
//! rustexpand command "inner::thing --ugly" --file src/lib.rs
//! rustexpand path "foo::bar" /path/to/project
//!
//! # Editor on-save hook: replay crate-wide and custom expansions
//! rustexpand refresh --file src/lib.rs
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod expand;
pub mod ident;
pub mod manifest;
pub mod provider;
pub mod request;
pub mod validate;
