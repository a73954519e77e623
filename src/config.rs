//! History settings.
//!
//! Settings are read from `~/.rusty-history/config.json` when that file exists.
//! Every field is optional; missing ones fall back to the defaults below.
//!
//! ```json
//! { "limit": 500, "autosave": false, "enabled": true, "path": "/tmp/history" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use crate::history::persistence;

/// Number of entries kept when no limit is configured.
pub const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of retained entries.
    pub limit: usize,
    /// Save after every added line.
    pub autosave: bool,
    /// When false, `save` never writes.
    pub enabled: bool,
    /// Backing file. `None` means `~/.rusty-history/history`.
    pub path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            autosave: true,
            enabled: true,
            path: None,
        }
    }
}

impl HistoryConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config JSON at {}", path.display()))?;
        Ok(config)
    }

    /// Load `~/.rusty-history/config.json`, or the defaults when it is absent.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = persistence::data_dir()?.join("config.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// The configured backing file, or the default location.
    pub fn history_path(&self) -> anyhow::Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => persistence::default_history_path(),
        }
    }
}
