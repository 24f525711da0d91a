//! User settings.
//!
//! Settings control how rendered output is decorated and whether `refresh`
//! replays anything. They are read from `~/.rustexpand/config.toml`
//! (`RUSTEXPAND_CONFIG` to override); a missing file means defaults, and
//! every field is individually optional.
//!
//! ```toml
//! # ~/.rustexpand/config.toml
//! display_command = true
//! display_path = true
//! display_timestamp = false
//! display_warnings = true
//! notify_warnings = true
//! refresh_on_save = true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const fn default_true() -> bool {
    true
}

/// Rendering and refresh preferences.
///
/// The core reads these; it never writes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Include the invoked command line at the top of rendered output
    #[serde(default = "default_true")]
    pub display_command: bool,

    /// Include the working directory at the top of rendered output
    #[serde(default = "default_true")]
    pub display_path: bool,

    /// Include a generation timestamp at the top of rendered output.
    ///
    /// Off by default so that re-running an unchanged expansion produces
    /// byte-identical output.
    #[serde(default)]
    pub display_timestamp: bool,

    /// Include captured warnings as a comment block at the top of rendered
    /// output
    #[serde(default = "default_true")]
    pub display_warnings: bool,

    /// Print a warnings notice after an expansion completes with warnings
    #[serde(default = "default_true")]
    pub notify_warnings: bool,

    /// Whether `rustexpand refresh` replays global expansions at all.
    ///
    /// Editors are expected to call `refresh` from their on-save hook; this
    /// switch lets users turn that off without reconfiguring the editor.
    #[serde(default = "default_true")]
    pub refresh_on_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_command: true,
            display_path: true,
            display_timestamp: false,
            display_warnings: true,
            notify_warnings: true,
            refresh_on_save: true,
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    ///
    /// - Unix/macOS: `~/.rustexpand/config.toml`
    /// - Windows: `%LOCALAPPDATA%\rustexpand\config.toml`
    /// - Override: `RUSTEXPAND_CONFIG` environment variable
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("RUSTEXPAND_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let base = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("rustexpand")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".rustexpand")
        };

        Ok(base.join("config.toml"))
    }

    /// Load settings from the default location, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() { Self::load_from(&path) } else { Ok(Self::default()) }
    }

    /// Load settings from an explicit path, or the default location when
    /// none is given.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path),
            None => Self::load(),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}
