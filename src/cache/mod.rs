//! The persistent expansion store.
//!
//! Rendered expansions live in a cache directory (`~/.rustexpand/cache` by
//! default, `RUSTEXPAND_CACHE_DIR` to override) as plain `.rs` files next to
//! an `index.json` that records, per identifier, the originating request and
//! when it last ran. The stored request is what makes `reload` and `refresh`
//! possible across invocations: replay never re-derives a command, it reuses
//! the recorded one.
//!
//! Entries are overwritten in place when the same identifier is expanded
//! again and are never evicted by the tool. The cache grows only with the
//! number of distinct files, crates, and custom commands the user expands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::ExpandError;
use crate::ident::VirtualId;
use crate::request::ExpandRequest;

/// File name of the cache index inside the cache directory.
const INDEX_FILE: &str = "index.json";

/// One cached expansion slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The originating request, replayed verbatim on reload/refresh
    pub request: ExpandRequest,
    /// Rendered text file, relative to the cache directory
    pub rendered_file: PathBuf,
    /// When this slot was last written
    pub updated_at: DateTime<Utc>,
}

/// Resolve the cache directory, creating it if needed.
///
/// # Location Priority
///
/// 1. `RUSTEXPAND_CACHE_DIR` environment variable (essential for testing)
/// 2. Platform default:
///    - Windows: `%LOCALAPPDATA%\rustexpand\cache`
///    - macOS/Linux: `~/.rustexpand/cache`
pub fn cache_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RUSTEXPAND_CACHE_DIR") {
        let dir = PathBuf::from(dir);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
        return Ok(dir);
    }

    let dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
            .join("rustexpand")
            .join("cache")
    } else {
        dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
            .join(".rustexpand")
            .join("cache")
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    }

    Ok(dir)
}

/// Resolve the cache directory from an explicit override or the default.
pub fn cache_dir_with_optional(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
            Ok(dir)
        }
        None => cache_dir(),
    }
}

/// The on-disk expansion cache.
///
/// Explicitly constructed and passed by reference to the handlers that need
/// it; there is no ambient singleton. Single-threaded dispatch means no
/// locking discipline is required - a later write for the same identifier
/// simply overwrites the earlier entry.
#[derive(Debug)]
pub struct ExpansionCache {
    root: PathBuf,
    index: BTreeMap<String, CacheEntry>,
}

impl ExpansionCache {
    /// Load the cache index from `root`, or start empty if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::CacheError`] when an index exists but cannot
    /// be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let index_path = root.join(INDEX_FILE);
        let index = if index_path.exists() {
            let content = fs::read_to_string(&index_path).map_err(|e| ExpandError::CacheError {
                reason: format!("could not read {}: {e}", index_path.display()),
            })?;
            serde_json::from_str(&content).map_err(|e| ExpandError::CacheError {
                reason: format!("could not parse {}: {e}", index_path.display()),
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            root: root.to_path_buf(),
            index,
        })
    }

    /// The cache directory this store lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up the entry for an identifier.
    pub fn get(&self, id: &VirtualId) -> Option<&CacheEntry> {
        self.index.get(&id.uri())
    }

    /// Whether `path` points inside the cache directory.
    ///
    /// Used by validation to refuse treating rendered output as a source
    /// file.
    pub fn contains(&self, path: &Path) -> bool {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        path.starts_with(root)
    }

    /// Write `text` for `request`, overwriting any previous entry for the
    /// same identifier, and persist the index.
    ///
    /// Returns the absolute path of the rendered file.
    pub fn insert(&mut self, request: ExpandRequest, text: &str) -> Result<PathBuf> {
        let file_name = request.id.file_name();
        let rendered_path = self.root.join(&file_name);
        fs::write(&rendered_path, text).map_err(|e| ExpandError::CacheError {
            reason: format!("could not write {}: {e}", rendered_path.display()),
        })?;

        let uri = request.id.uri();
        tracing::debug!(target: "cache", "Storing expansion for {uri}");
        self.index.insert(
            uri,
            CacheEntry {
                request,
                rendered_file: PathBuf::from(file_name),
                updated_at: Utc::now(),
            },
        );
        self.save()?;

        Ok(rendered_path)
    }

    /// All cached entries, ordered by identifier URI.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.index.iter()
    }

    /// Number of cached expansions.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the cache holds no expansions.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn save(&self) -> Result<()> {
        let index_path = self.root.join(INDEX_FILE);
        let content =
            serde_json::to_string_pretty(&self.index).map_err(|e| ExpandError::CacheError {
                reason: format!("could not serialize index: {e}"),
            })?;
        fs::write(&index_path, content).map_err(|e| ExpandError::CacheError {
            reason: format!("could not write {}: {e}", index_path.display()),
        })?;
        Ok(())
    }
}
