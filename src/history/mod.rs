//! Command history buffer for an interactive line editor.
//!
//! [`HistoryStore`] keeps previously submitted lines in order (oldest first),
//! bounded by a size limit, with a navigation cursor for walking back and
//! forth through them. The buffer is loaded from a plain-text file on startup
//! and written back with an atomic temp-file-then-rename swap.

pub mod persistence;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::HistoryConfig;

/// Ordered, size-bounded history with a navigation cursor.
///
/// The cursor ranges over `0..=len`. A cursor equal to `len` is the "end"
/// position: no historical line is selected and the editor shows live input.
#[derive(Debug)]
pub struct HistoryStore {
    entries: Vec<String>,
    limit: usize,
    cursor: usize,
    autosave: bool,
    enabled: bool,
    path: PathBuf,
}

impl HistoryStore {
    /// Open the history at the default location (`~/.rusty-history/history`).
    pub fn new(limit: usize, autosave: bool, enabled: bool) -> anyhow::Result<Self> {
        Self::with_path(persistence::default_history_path()?, limit, autosave, enabled)
    }

    pub fn open(config: &HistoryConfig) -> anyhow::Result<Self> {
        Self::with_path(
            config.history_path()?,
            config.limit,
            config.autosave,
            config.enabled,
        )
    }

    /// Open the history backed by `path`, creating the file if it is missing.
    ///
    /// Loaded lines go through the same append path as [`add`](Self::add), so
    /// a file longer than `limit` keeps only its last `limit` lines. Any read
    /// failure other than the file not existing is returned as an error.
    pub fn with_path(
        path: impl Into<PathBuf>,
        limit: usize,
        autosave: bool,
        enabled: bool,
    ) -> anyhow::Result<Self> {
        let mut store = Self {
            entries: Vec::new(),
            limit,
            cursor: 0,
            autosave,
            enabled,
            path: path.into(),
        };

        let lines = persistence::load_lines(&store.path)?;
        let loaded = lines.len();
        for line in lines {
            store.append(line);
        }
        debug!(
            "Loaded {} history entries from {}",
            store.entries.len(),
            store.path.display()
        );

        // Rewrite once so an oversized file does not keep growing on disk.
        if store.autosave && loaded > store.entries.len() {
            store.save_quietly();
        }
        Ok(store)
    }

    fn append(&mut self, line: String) {
        self.entries.push(line);
        self.compact();
        self.cursor = self.entries.len();
    }

    fn save_quietly(&self) {
        if let Err(e) = self.save() {
            warn!("History autosave failed: {:#}", e);
        }
    }

    /// Append a line and move the cursor back to the end.
    ///
    /// The line is stored as given: no trimming, deduplication or filtering of
    /// blank input. When autosave is on the whole history is written before
    /// returning. A failed autosave is logged and otherwise ignored so that a
    /// full disk never interrupts editing; call [`save`](Self::save) directly
    /// when the outcome matters.
    pub fn add(&mut self, line: impl Into<String>) {
        self.append(line.into());
        if self.autosave {
            self.save_quietly();
        }
    }

    /// Drop the oldest entries until at most `limit` remain.
    pub fn compact(&mut self) {
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            debug!("Evicted {} oldest history entries", excess);
        }
        self.cursor = self.cursor.min(self.entries.len());
    }

    /// Empty the in-memory history. The backing file is not touched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = self.cursor.min(self.entries.len());
    }

    /// Step to the previous (older) entry and return it.
    ///
    /// Stops at the oldest entry: further calls keep returning it. Returns an
    /// empty line when the history is empty.
    pub fn prev(&mut self) -> &str {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.entry_at(self.cursor)
    }

    /// Step to the next (newer) entry and return it.
    ///
    /// Stepping past the newest entry lands on the end position and returns an
    /// empty line, telling the editor to clear its input. At the end position
    /// this does nothing and returns an empty line.
    pub fn next(&mut self) -> &str {
        if self.cursor >= self.entries.len() {
            return "";
        }
        self.cursor += 1;
        self.entry_at(self.cursor)
    }

    fn entry_at(&self, index: usize) -> &str {
        self.entries.get(index).map(String::as_str).unwrap_or("")
    }

    /// Write every entry to the backing file, replacing it atomically.
    ///
    /// Does nothing when persistence is disabled. On error the backing file
    /// keeps its previous contents and the in-memory history is unchanged.
    pub fn save(&self) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        persistence::write_atomic(&self.path, &self.entries)?;
        debug!(
            "Saved {} history entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Number of stored entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    pub fn persistence_enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
