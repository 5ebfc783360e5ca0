//! Persisted library settings: registered roots and scan tuning.
//!
//! Stored as the `[library]` table of
//! `~/.config/title-shelf/settings.toml`. Other tables in the file are left
//! untouched on save, so frontends can keep their own settings alongside.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::error::SettingsError;
use crate::library::{GameLibrary, LibraryOptions};

/// Canonical path to the settings file: `~/.config/title-shelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("title-shelf").join("settings.toml")
}

/// The `[library]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Roots to register on startup
    pub roots: Vec<PathBuf>,
    /// Concurrent parse workers for background scans; 0 means one per CPU
    pub scan_workers: usize,
    /// Per-package parse limit in seconds
    pub parse_timeout_secs: u64,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            scan_workers: 0,
            parse_timeout_secs: crate::library::DEFAULT_PARSE_TIMEOUT.as_secs(),
        }
    }
}

impl LibrarySettings {
    /// Scan tuning described by these settings.
    pub fn options(&self) -> LibraryOptions {
        let defaults = LibraryOptions::default();
        LibraryOptions {
            scan_workers: if self.scan_workers == 0 {
                defaults.scan_workers
            } else {
                self.scan_workers
            },
            parse_timeout: if self.parse_timeout_secs == 0 {
                defaults.parse_timeout
            } else {
                Duration::from_secs(self.parse_timeout_secs)
            },
        }
    }

    /// Settings capturing `library`'s current roots, keeping the tuning from `self`.
    pub fn with_roots_of(&self, library: &GameLibrary) -> Self {
        Self {
            roots: library.roots(),
            ..self.clone()
        }
    }

    /// Parse the `[library]` table out of a full settings document.
    /// A document without the table yields defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let doc: toml::Table = contents.parse()?;
        match doc.get("library") {
            Some(value) => Ok(value.clone().try_into()?),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the `[library]` table into `path`, preserving other tables.
    ///
    /// Written atomically via a temp file and rename.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let mut doc: toml::Table = match std::fs::read_to_string(path) {
            Ok(contents) => contents.parse()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e.into()),
        };

        doc.insert("library".to_string(), toml::Value::try_from(self)?);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(&doc)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)?;

        log::debug!("Saved library settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
