//! SQLite-backed entry store.
//!
//! # Invariants
//! - `created_at` is written as fixed-width RFC 3339 UTC with microseconds,
//!   so lexical `ORDER BY` matches chronological order.
//! - Any other stored timestamp shape is rejected on read, since it would
//!   sort out of chronological order.
//! - Read paths reject undecodable rows instead of masking them.

use super::{EntryStore, StoreError, StoreResult};
use crate::db::{JOURNAL_COLUMNS, JOURNAL_TABLE};
use crate::model::entry::{Entry, NewEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_NEWEST_FIRST_SQL: &str = "SELECT id, entry, minutes, created_at
FROM journal
ORDER BY created_at DESC, id DESC;";

/// Journal store over a borrowed SQLite connection.
pub struct SqliteEntryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryStore<'conn> {
    /// Wraps a connection after checking the journal table shape.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the connection was never bootstrapped.
    /// - `MissingRequiredColumn` when the table lacks a journal column.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_journal_shape(conn)?;
        Ok(Self { conn })
    }
}

impl EntryStore for SqliteEntryStore<'_> {
    fn insert(&self, entry: &NewEntry, created_at: DateTime<Utc>) -> StoreResult<Entry> {
        self.conn.execute(
            "INSERT INTO journal (entry, minutes, created_at) VALUES (?1, ?2, ?3);",
            params![
                entry.task(),
                entry.minutes(),
                format_timestamp(created_at)
            ],
        )?;
        let id = self.conn.last_insert_rowid();

        Ok(entry.clone().into_entry(id, created_at))
    }

    fn list_newest_first(&self) -> StoreResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(SELECT_NEWEST_FIRST_SQL)?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }
}

fn ensure_journal_shape(conn: &Connection) -> StoreResult<()> {
    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [JOURNAL_TABLE],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(StoreError::MissingRequiredTable(JOURNAL_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([JOURNAL_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in JOURNAL_COLUMNS {
        if !present.iter().any(|name| name.as_str() == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: JOURNAL_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_entry_row(row: &Row<'_>) -> StoreResult<Entry> {
    let id: i64 = row.get("id")?;
    let minutes: i64 = row.get("minutes")?;
    if minutes < 0 {
        return Err(StoreError::InvalidData(format!(
            "negative minutes `{minutes}` in journal row {id}"
        )));
    }

    let created_text: String = row.get("created_at")?;
    let created_at = parse_timestamp(&created_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid timestamp `{created_text}` in journal row {id}"
        ))
    })?;

    Ok(Entry {
        id,
        task: row.get("entry")?,
        minutes,
        created_at,
    })
}

pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decodes a stored timestamp, accepting only the canonical form written by
/// `format_timestamp`.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .ok()?
        .with_timezone(&Utc);
    (format_timestamp(parsed) == value).then_some(parsed)
}
