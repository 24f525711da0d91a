//! Virtual identifiers for rendered expansions.
//!
//! Every expansion is stored under a [`VirtualId`]: the reserved `rustexpand`
//! scheme plus a human-readable label derived from the source file name, the
//! crate name, or the custom command text. Identifiers are the cache key -
//! two requests that produce the same label share one cache slot, which is
//! what lets `reload` overwrite the earlier result in place.
//!
//! This module also derives the module path passed to `cargo expand` for
//! per-file expansions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::core::ExpandError;

/// The reserved scheme tag identifying documents produced by rustexpand.
pub const SCHEME: &str = "rustexpand";

/// Label marker for per-file expansions.
const FILE_MARKER: &str = "[expanded]";
/// Label marker for whole-crate expansions.
const CRATE_MARKER: &str = "[expanded-crate]";
/// Label marker for custom-command expansions.
const CUSTOM_MARKER: &str = "[expanded-custom]";

/// An opaque identifier for one cached expansion slot.
///
/// Renders as `rustexpand:<label>`. Identifiers always carry the reserved
/// scheme; anything under another scheme is never treated as expansion
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VirtualId {
    label: String,
}

impl VirtualId {
    /// Identifier for a per-file (module) expansion.
    pub fn for_file(file: &Path) -> Self {
        let base = file
            .file_name()
            .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            label: format!("{FILE_MARKER} {base}"),
        }
    }

    /// Identifier for a whole-crate expansion, labeled by crate name.
    pub fn for_crate(crate_name: &str) -> Self {
        Self {
            label: format!("{CRATE_MARKER} {crate_name}"),
        }
    }

    /// Identifier for a custom command, labeled by the sub-command text.
    ///
    /// The `cargo expand` prefix is stripped so that distinct sub-commands
    /// get distinguishable cache slots.
    pub fn for_custom(command: &str) -> Self {
        let text = command.strip_prefix("cargo expand").unwrap_or(command).trim();
        let text = if text.is_empty() { "crate" } else { text };
        Self {
            label: format!("{CUSTOM_MARKER} {text}"),
        }
    }

    /// Parse a user-supplied identifier, either `rustexpand:<label>` or a
    /// bare label.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::SchemeMismatch`] when the input carries a
    /// different URI scheme (e.g. `file:...`).
    pub fn parse(input: &str) -> Result<Self, ExpandError> {
        if let Some(label) = input.strip_prefix("rustexpand:") {
            return Ok(Self {
                label: label.to_string(),
            });
        }

        // A single leading `name:` (not `::`) is some other scheme.
        if let Some((scheme, rest)) = input.split_once(':') {
            let scheme_like = !scheme.is_empty()
                && !rest.starts_with(':')
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c));
            if scheme_like {
                return Err(ExpandError::SchemeMismatch {
                    id: input.to_string(),
                });
            }
        }

        Ok(Self {
            label: input.to_string(),
        })
    }

    /// The human-readable label shown in `list` output and display names.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The full `rustexpand:<label>` URI used as the cache key.
    pub fn uri(&self) -> String {
        format!("{SCHEME}:{}", self.label)
    }

    /// A filesystem-safe file name for the rendered text.
    ///
    /// Labels contain characters that are not portable in file names
    /// (`[`, `:`, spaces), so runs of anything outside `[A-Za-z0-9_.]` are
    /// collapsed to a single `-`.
    pub fn file_name(&self) -> String {
        let mut out = String::with_capacity(self.label.len() + 3);
        let mut dash = false;
        for c in self.label.chars() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                out.push(c);
                dash = false;
            } else if !dash && !out.is_empty() {
                out.push('-');
                dash = true;
            }
        }
        let trimmed = out.trim_end_matches('-');
        format!("{trimmed}.rs")
    }
}

impl fmt::Display for VirtualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// Derive the module path `cargo expand` should be scoped to for `file`.
///
/// The file path is made relative to the manifest directory, the leading
/// `src` segment is dropped, a trailing `mod.rs` marker or `.rs` extension is
/// stripped, and the remaining segments are joined with `::`.
///
/// Returns `None` for degenerate derivations - an empty path or a crate root
/// (`src/main.rs`, `src/lib.rs`) - in which case the caller falls back to
/// whole-crate scope.
///
/// # Examples
///
/// ```rust
/// use rustexpand::ident::module_path;
/// use std::path::Path;
///
/// let root = Path::new("/proj");
/// assert_eq!(module_path(root, Path::new("/proj/src/inner/mod.rs")), Some("inner".into()));
/// assert_eq!(module_path(root, Path::new("/proj/src/inner/thing.rs")), Some("inner::thing".into()));
/// assert_eq!(module_path(root, Path::new("/proj/src/main.rs")), None);
/// ```
pub fn module_path(manifest_dir: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(manifest_dir).ok()?;
    let mut parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.first().is_some_and(|p| p == "src") {
        parts.remove(0);
    }

    let last = parts.pop()?;
    let stem = last.strip_suffix(".rs").unwrap_or(&last);
    match stem {
        // mod.rs names the enclosing directory's module
        "mod" => {}
        // crate roots have no module path
        "main" | "lib" if parts.is_empty() => return None,
        _ => parts.push(stem.to_string()),
    }

    if parts.is_empty() { None } else { Some(parts.join("::")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_mod_rs() {
        assert_eq!(
            module_path(Path::new("/proj"), Path::new("/proj/src/inner/mod.rs")),
            Some("inner".to_string())
        );
    }

    #[test]
    fn test_module_path_nested_file() {
        assert_eq!(
            module_path(Path::new("/proj"), Path::new("/proj/src/inner/thing.rs")),
            Some("inner::thing".to_string())
        );
    }

    #[test]
    fn test_module_path_top_level_module() {
        assert_eq!(
            module_path(Path::new("/proj"), Path::new("/proj/src/foo.rs")),
            Some("foo".to_string())
        );
    }

    #[test]
    fn test_module_path_crate_roots_are_degenerate() {
        assert_eq!(module_path(Path::new("/proj"), Path::new("/proj/src/main.rs")), None);
        assert_eq!(module_path(Path::new("/proj"), Path::new("/proj/src/lib.rs")), None);
    }

    #[test]
    fn test_module_path_outside_manifest_dir() {
        assert_eq!(module_path(Path::new("/proj"), Path::new("/other/src/a.rs")), None);
    }

    #[test]
    fn test_file_identifier() {
        let id = VirtualId::for_file(Path::new("/proj/src/inner/thing.rs"));
        assert_eq!(id.label(), "[expanded] thing.rs");
        assert_eq!(id.uri(), "rustexpand:[expanded] thing.rs");
    }

    #[test]
    fn test_crate_identifier() {
        let id = VirtualId::for_crate("demo");
        assert_eq!(id.uri(), "rustexpand:[expanded-crate] demo");
    }

    #[test]
    fn test_custom_identifier_strips_prefix() {
        let id = VirtualId::for_custom("cargo expand foo::bar");
        assert_eq!(id.label(), "[expanded-custom] foo::bar");
        // Same sub-command, same slot
        assert_eq!(VirtualId::for_custom("cargo expand foo::bar"), id);
    }

    #[test]
    fn test_parse_round_trip() {
        let id = VirtualId::for_crate("demo");
        assert_eq!(VirtualId::parse(&id.uri()).unwrap(), id);
    }

    #[test]
    fn test_parse_bare_label_with_module_separators() {
        let id = VirtualId::parse("[expanded-custom] foo::bar").unwrap();
        assert_eq!(id.label(), "[expanded-custom] foo::bar");
    }

    #[test]
    fn test_parse_rejects_foreign_scheme() {
        let err = VirtualId::parse("file:/proj/src/main.rs").unwrap_err();
        assert!(matches!(err, ExpandError::SchemeMismatch { .. }));
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let id = VirtualId::for_custom("cargo expand foo::bar");
        assert_eq!(id.file_name(), "expanded-custom-foo-bar.rs");

        let id = VirtualId::for_file(Path::new("thing.rs"));
        assert_eq!(id.file_name(), "expanded-thing.rs.rs");
    }
}
