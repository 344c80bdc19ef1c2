//! Render-ready projection of the journal.
//!
//! # Invariants
//! - A read failure never escapes as an error: the view degrades to no rows,
//!   a zero total and an explicit error message.
//! - Rows keep the store order (most recent first).

use crate::display::{format_created_at, format_minutes, DisplaySettings};
use crate::model::entry::{Entry, EntryId};
use crate::service::entry_log::{Clock, EntryLog, EntryLogSnapshot};
use crate::store::EntryStore;

pub const EMPTY_PLACEHOLDER: &str = "No entries yet. Start journaling!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: EntryId,
    pub task: String,
    pub minutes: i64,
    /// Local wall time in the configured display offset.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JournalView {
    pub rows: Vec<EntryRow>,
    pub total_minutes: i64,
    /// Set when entries could not be loaded.
    pub error: Option<String>,
}

impl JournalView {
    /// Fetches a fresh snapshot and projects it for display.
    pub fn load<S: EntryStore, C: Clock>(log: &EntryLog<S, C>, display: &DisplaySettings) -> Self {
        match log.snapshot() {
            Ok(snapshot) => Self::from_snapshot(snapshot, display),
            Err(err) => Self {
                rows: Vec::new(),
                total_minutes: 0,
                error: Some(err.user_message()),
            },
        }
    }

    pub fn from_snapshot(snapshot: EntryLogSnapshot, display: &DisplaySettings) -> Self {
        Self {
            rows: snapshot
                .entries
                .into_iter()
                .map(|entry| to_row(entry, display))
                .collect(),
            total_minutes: snapshot.total_minutes,
            error: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain-text rendering: total first, then one block per entry.
    pub fn render_text(&self) -> String {
        let mut out = format!("Total Time: {}\n", format_minutes(self.total_minutes));
        if let Some(error) = &self.error {
            out.push_str(&format!("Error: {error}\n"));
        }
        out.push('\n');

        if self.rows.is_empty() {
            if self.error.is_none() {
                out.push_str(EMPTY_PLACEHOLDER);
                out.push('\n');
            }
            return out;
        }

        for row in &self.rows {
            out.push_str(&format!(
                "{}\n  {} | {}\n---\n",
                row.task,
                format_minutes(row.minutes),
                row.created_at
            ));
        }
        out
    }
}

fn to_row(entry: Entry, display: &DisplaySettings) -> EntryRow {
    EntryRow {
        id: entry.id,
        created_at: format_created_at(entry.created_at, display.offset),
        task: entry.task,
        minutes: entry.minutes,
    }
}
