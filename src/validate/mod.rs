//! Per-command validation and request construction.
//!
//! Each CLI entry point funnels through here to turn raw user input into a
//! validated [`ExpandRequest`] or a typed error. Validation short-circuits on
//! the first failure; `main` renders exactly one message per failed
//! invocation from the returned error, so callers never report anything
//! themselves.

use anyhow::{Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::ExpansionCache;
use crate::core::ExpandError;
use crate::expand::CARGO_EXPAND;
use crate::ident::{self, VirtualId};
use crate::manifest;
use crate::request::ExpandRequest;

/// Validate that `path` is an expandable Rust source file.
///
/// Checks, in order: the file exists, it has the `.rs` extension, and it is
/// not itself rendered expansion output (the original's scheme check -
/// documents produced by this tool are inert views, never inputs).
///
/// Returns the canonicalized path so that later prefix-stripping against the
/// manifest directory is reliable.
pub fn source_file(path: &Path, cache: &ExpansionCache) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(ExpandError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let file = fs::canonicalize(path)?;

    if file.extension().is_none_or(|ext| ext != "rs") {
        return Err(ExpandError::NotRustFile {
            path: path.display().to_string(),
        }
        .into());
    }

    if cache.contains(&file) {
        return Err(ExpandError::VirtualDocument {
            path: path.display().to_string(),
        }
        .into());
    }

    Ok(file)
}

/// Build the request for `expand` (module scope) or `crate` (whole-project
/// scope).
///
/// Module scope derives the module path from the file's location under the
/// manifest directory; when the derivation is degenerate (a crate root such
/// as `src/main.rs`) the command falls back to whole-crate scope while
/// keeping the per-file identifier.
pub fn expand_request(
    path: &Path,
    crate_scope: bool,
    cache: &ExpansionCache,
) -> Result<ExpandRequest> {
    let file = source_file(path, cache)?;
    let manifest_dir = manifest::find_manifest_dir(&file)?;

    if crate_scope {
        let name = manifest::crate_name(&manifest_dir)?;
        let id = VirtualId::for_crate(&name);
        return Ok(ExpandRequest {
            manifest_dir,
            command: CARGO_EXPAND.to_string(),
            display_name: id.label().to_string(),
            id,
            global: true,
        });
    }

    let id = VirtualId::for_file(&file);
    let command = match ident::module_path(&manifest_dir, &file) {
        Some(module) => format!("{CARGO_EXPAND} {module}"),
        // Degenerate module path: expand the whole crate under this file's
        // identifier.
        None => CARGO_EXPAND.to_string(),
    };

    Ok(ExpandRequest {
        manifest_dir,
        command,
        display_name: id.label().to_string(),
        id,
        global: false,
    })
}

/// Build the request for `command` (resolved manifest directory) or `path`
/// (explicit directory).
///
/// With an explicit directory, manifest resolution is bypassed entirely and
/// the command runs exactly there. Without one, a source file is required
/// and its enclosing manifest directory is used.
pub fn custom_request(
    text: &str,
    dir: Option<&Path>,
    file: Option<&Path>,
    cache: &ExpansionCache,
) -> Result<ExpandRequest> {
    let command = normalize_command(text)?;
    let id = VirtualId::for_custom(&command);

    let manifest_dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            let Some(file) = file else {
                bail!("a source file (--file) or an explicit directory is required");
            };
            let file = source_file(file, cache)?;
            manifest::find_manifest_dir(&file)?
        }
    };

    Ok(ExpandRequest {
        manifest_dir,
        command,
        display_name: id.label().to_string(),
        id,
        global: true,
    })
}

/// Normalize custom command text to a full `cargo expand ...` command line.
///
/// The prefix is prepended unless the user already typed it; blank input is
/// [`ExpandError::EmptyCommand`].
pub fn normalize_command(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExpandError::EmptyCommand.into());
    }
    if text == "cargo" || text.starts_with("cargo ") {
        Ok(text.to_string())
    } else {
        Ok(format!("{CARGO_EXPAND} {text}"))
    }
}

/// Validate a user-supplied working directory.
///
/// Tilde and environment references are expanded (`~/proj`, `$HOME/proj`)
/// before the existence check.
pub fn directory(input: &str) -> Result<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ExpandError::InvalidPath {
            path: input.to_string(),
        }
        .into());
    }

    let expanded = shellexpand::full(input)
        .map(|s| PathBuf::from(s.as_ref()))
        .unwrap_or_else(|_| PathBuf::from(input));

    if !expanded.is_dir() {
        return Err(ExpandError::InvalidPath {
            path: input.to_string(),
        }
        .into());
    }

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_cache() -> (TempDir, ExpansionCache) {
        let dir = TempDir::new().unwrap();
        let cache = ExpansionCache::load(dir.path()).unwrap();
        (dir, cache)
    }

    /// A project with src/main.rs, src/inner/mod.rs, and src/inner/thing.rs.
    fn project(name: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\n"),
        )
        .unwrap();
        let inner = dir.path().join("src").join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "fn main() {}\n").unwrap();
        fs::write(inner.join("mod.rs"), "pub mod thing;\n").unwrap();
        fs::write(inner.join("thing.rs"), "pub fn thing() {}\n").unwrap();
        dir
    }

    fn expand_err(e: anyhow::Error) -> ExpandError {
        e.downcast::<ExpandError>().unwrap()
    }

    #[test]
    fn test_source_file_must_exist() {
        let (_dir, cache) = empty_cache();
        let err = source_file(Path::new("/nope/missing.rs"), &cache).unwrap_err();
        assert!(matches!(expand_err(err), ExpandError::FileNotFound { .. }));
    }

    #[test]
    fn test_source_file_must_be_rust() {
        let (_c, cache) = empty_cache();
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "").unwrap();

        let err = source_file(&file, &cache).unwrap_err();
        assert!(matches!(expand_err(err), ExpandError::NotRustFile { .. }));
    }

    #[test]
    fn test_source_file_rejects_rendered_output() {
        let (cache_dir, cache) = empty_cache();
        let rendered = cache_dir.path().join("expanded-thing.rs");
        fs::write(&rendered, "// rendered\n").unwrap();

        let err = source_file(&rendered, &cache).unwrap_err();
        assert!(matches!(expand_err(err), ExpandError::VirtualDocument { .. }));
    }

    #[test]
    fn test_expand_request_module_scope() {
        let (_c, cache) = empty_cache();
        let proj = project("demo");
        let file = proj.path().join("src").join("inner").join("thing.rs");

        let req = expand_request(&file, false, &cache).unwrap();
        assert_eq!(req.command, "cargo expand inner::thing");
        assert_eq!(req.manifest_dir, proj.path().canonicalize().unwrap());
        assert_eq!(req.id.label(), "[expanded] thing.rs");
        assert!(!req.global);
    }

    #[test]
    fn test_expand_request_mod_rs() {
        let (_c, cache) = empty_cache();
        let proj = project("demo");
        let file = proj.path().join("src").join("inner").join("mod.rs");

        let req = expand_request(&file, false, &cache).unwrap();
        assert_eq!(req.command, "cargo expand inner");
    }

    #[test]
    fn test_expand_request_crate_root_falls_back_to_crate_scope() {
        let (_c, cache) = empty_cache();
        let proj = project("demo");
        let file = proj.path().join("src").join("main.rs");

        let req = expand_request(&file, false, &cache).unwrap();
        assert_eq!(req.command, "cargo expand");
        // The identifier stays per-file even for the fallback
        assert_eq!(req.id.label(), "[expanded] main.rs");
        assert!(!req.global);
    }

    #[test]
    fn test_expand_request_crate_scope_uses_crate_name() {
        let (_c, cache) = empty_cache();
        let proj = project("demo");
        let file = proj.path().join("src").join("main.rs");

        let req = expand_request(&file, true, &cache).unwrap();
        assert_eq!(req.command, "cargo expand");
        assert_eq!(req.id.label(), "[expanded-crate] demo");
        assert!(req.global);
    }

    #[test]
    fn test_expand_request_crate_scope_without_package_name_fails() {
        let (_c, cache) = empty_cache();
        let proj = project("demo");
        fs::write(proj.path().join("Cargo.toml"), "[workspace]\nmembers = []\n").unwrap();
        let file = proj.path().join("src").join("main.rs");

        let err = expand_request(&file, true, &cache).unwrap_err();
        assert!(matches!(expand_err(err), ExpandError::CrateNameMissing { .. }));
    }

    #[test]
    fn test_custom_request_with_explicit_directory() {
        let (_c, cache) = empty_cache();
        let dir = TempDir::new().unwrap();

        let req = custom_request("foo::bar", Some(dir.path()), None, &cache).unwrap();
        assert_eq!(req.command, "cargo expand foo::bar");
        assert_eq!(req.manifest_dir, dir.path());
        assert_eq!(req.id.label(), "[expanded-custom] foo::bar");
        assert!(req.global);
    }

    #[test]
    fn test_custom_request_resolves_manifest_from_file() {
        let (_c, cache) = empty_cache();
        let proj = project("demo");
        let file = proj.path().join("src").join("main.rs");

        let req = custom_request("--ugly", None, Some(&file), &cache).unwrap();
        assert_eq!(req.command, "cargo expand --ugly");
        assert_eq!(req.manifest_dir, proj.path().canonicalize().unwrap());
    }

    #[test]
    fn test_custom_request_needs_file_or_directory() {
        let (_c, cache) = empty_cache();
        assert!(custom_request("foo", None, None, &cache).is_err());
    }

    #[test]
    fn test_normalize_command() {
        assert_eq!(normalize_command("foo::bar").unwrap(), "cargo expand foo::bar");
        assert_eq!(normalize_command("cargo expand foo").unwrap(), "cargo expand foo");
        assert_eq!(normalize_command("  foo  ").unwrap(), "cargo expand foo");

        let err = normalize_command("   ").unwrap_err();
        assert!(matches!(expand_err(err), ExpandError::EmptyCommand));
    }

    #[test]
    fn test_directory_validation() {
        let dir = TempDir::new().unwrap();
        let ok = directory(&dir.path().display().to_string()).unwrap();
        assert_eq!(ok, dir.path());

        let err = directory("/definitely/not/here").unwrap_err();
        assert!(matches!(expand_err(err), ExpandError::InvalidPath { .. }));

        let err = directory("").unwrap_err();
        assert!(matches!(expand_err(err), ExpandError::InvalidPath { .. }));
    }
}
