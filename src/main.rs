//! Main entry point for RustyHistory.
//!
//! Reads lines from stdin and feeds them to the history buffer the way a line
//! editor would. Lines starting with `:` drive the buffer directly:
//! `:prev`, `:next`, `:size`, `:clear`, `:save`, `:quit`.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use rusty_history::history::persistence;
use rusty_history::utils;
use rusty_history::{HistoryConfig, HistoryStore};

fn main() -> Result<()> {
    // Initialize logging before anything else
    let _log_guard = utils::logger::init_logging(&persistence::data_dir()?.join("logs"));

    let config = HistoryConfig::load_or_default()?;
    let mut history = HistoryStore::open(&config)?;
    tracing::info!(
        "History ready: {} entries, limit {}, autosave {}",
        history.size(),
        history.limit(),
        history.autosave()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            ":quit" => break,
            ":prev" => writeln!(stdout, "{}", history.prev())?,
            ":next" => writeln!(stdout, "{}", history.next())?,
            ":size" => writeln!(stdout, "{}", history.size())?,
            ":clear" => history.clear(),
            ":save" => {
                if let Err(e) = history.save() {
                    tracing::error!("Save failed: {:#}", e);
                    writeln!(stdout, "save failed: {:#}", e)?;
                }
            }
            _ => history.add(line),
        }
        stdout.flush()?;
    }
    Ok(())
}
