//! RustyHistory - a persistent command history buffer for line editors.
//!
//! The line editor appends each submitted line with [`HistoryStore::add`] and
//! walks through earlier lines with [`HistoryStore::prev`] and
//! [`HistoryStore::next`]. History is kept in `~/.rusty-history/history`.
//!
//! # Example
//!
//! ```no_run
//! use rusty_history::HistoryStore;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut history = HistoryStore::new(100, true, true)?;
//!
//!     history.add("ls -la");
//!     history.add("cargo build");
//!
//!     assert_eq!(history.prev(), "cargo build");
//!     assert_eq!(history.prev(), "ls -la");
//!     assert_eq!(history.next(), "cargo build");
//!     assert_eq!(history.next(), "");
//!
//!     history.save()
//! }
//! ```

pub mod config;
pub mod history;
pub mod utils;

pub use config::HistoryConfig;
pub use history::HistoryStore;
