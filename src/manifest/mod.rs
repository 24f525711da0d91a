//! Manifest discovery and crate-name extraction.
//!
//! Expansion always runs in the directory that owns the enclosing
//! `Cargo.toml`, so every command starts by walking the ancestor directories
//! of the input file until a manifest is found. The walk matches the exact
//! file name `Cargo.toml` (never a substring), and it is repeated on every
//! call; directory depth is small and invocations are user-triggered, so
//! caching the result is not worth the staleness risk.
//!
//! Crate-wide expansions additionally need the crate's name for their cache
//! label. The name is read with a structured TOML parse of the
//! `[package] name` key; a manifest without one is a hard error, never a
//! fallback to the file name.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::ExpandError;

/// The manifest file name searched for during upward resolution.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Just enough of a Cargo manifest to extract the package name.
#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: Option<String>,
}

/// Find the directory containing the enclosing `Cargo.toml`.
///
/// `start` may be a file or a directory; the search begins at the file's
/// parent directory and walks upward until a manifest is found or the
/// filesystem root is reached.
///
/// # Errors
///
/// Returns [`ExpandError::ManifestNotFound`] when no ancestor directory
/// contains a `Cargo.toml`.
///
/// # Examples
///
/// ```rust,no_run
/// use rustexpand::manifest::find_manifest_dir;
/// use std::path::Path;
///
/// # fn main() -> anyhow::Result<()> {
/// let dir = find_manifest_dir(Path::new("/proj/src/inner/thing.rs"))?;
/// assert_eq!(dir, Path::new("/proj"));
/// # Ok(())
/// # }
/// ```
pub fn find_manifest_dir(start: &Path) -> Result<PathBuf> {
    let mut current = if start.is_file() {
        start.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
    } else {
        start.to_path_buf()
    };

    loop {
        if current.join(MANIFEST_FILE).is_file() {
            tracing::debug!(target: "manifest", "Found {} in {}", MANIFEST_FILE, current.display());
            return Ok(current);
        }

        if !current.pop() {
            return Err(ExpandError::ManifestNotFound {
                start: start.display().to_string(),
            }
            .into());
        }
    }
}

/// Read the crate name from `<manifest_dir>/Cargo.toml`.
///
/// # Errors
///
/// - [`ExpandError::ManifestParseError`] when the file is not valid TOML
/// - [`ExpandError::CrateNameMissing`] when there is no `[package] name`
pub fn crate_name(manifest_dir: &Path) -> Result<String> {
    let path = manifest_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).map_err(|e| ExpandError::ManifestParseError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let manifest: CargoManifest =
        toml::from_str(&content).map_err(|e| ExpandError::ManifestParseError {
            path: path.display().to_string(),
            reason: e.message().to_string(),
        })?;

    manifest
        .package
        .and_then(|p| p.name)
        .ok_or_else(|| {
            ExpandError::CrateNameMissing {
                path: path.display().to_string(),
            }
            .into()
        })
}
