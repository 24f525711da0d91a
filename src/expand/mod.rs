//! External tool invocation.
//!
//! rustexpand never links against a compiler; like Cargo's own use of the
//! system `git`, it shells out to the user's `cargo expand` and treats the
//! captured text as opaque. See [`command_builder`] for the invocation
//! details.

pub mod command_builder;

pub use command_builder::{CargoCommand, ExpandOutput};

/// The base command every expansion runs through.
pub const CARGO_EXPAND: &str = "cargo expand";
