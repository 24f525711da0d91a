//! The request data model.
//!
//! An [`ExpandRequest`] captures everything needed to run one expansion:
//! where to run, what to run, and the cache slot the rendered result lands
//! in. Requests are serialized into the cache index so that `reload` and
//! `refresh` replay the exact original command in the exact original
//! directory rather than re-deriving either.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ident::VirtualId;

/// A fully validated expansion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandRequest {
    /// Directory containing the `Cargo.toml` the command runs against; also
    /// the working directory of the external process
    pub manifest_dir: PathBuf,
    /// The complete command line, e.g. `cargo expand inner::thing`
    pub command: String,
    /// The cache slot the rendered output is stored under
    pub id: VirtualId,
    /// Human-readable name shown in notifications and `list` output
    pub display_name: String,
    /// Crate-wide and custom expansions are global: they are replayed by
    /// `refresh` unconditionally. Per-module expansions are not.
    pub global: bool,
}

/// Either a fresh expansion or a replay of a stored one.
///
/// A [`Request::Reload`] never fabricates a computation context: the provider
/// resolves it to the stored [`ExpandRequest`] for that identifier and fails
/// if none exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Run a validated command and store the result
    Expand(ExpandRequest),
    /// Replay the stored request for an identifier
    Reload(VirtualId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_request_round_trips_through_json() {
        let request = ExpandRequest {
            manifest_dir: PathBuf::from("/proj"),
            command: "cargo expand inner".to_string(),
            id: VirtualId::for_file(Path::new("/proj/src/inner/mod.rs")),
            display_name: "[expanded] mod.rs".to_string(),
            global: false,
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: ExpandRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
