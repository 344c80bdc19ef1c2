//! Journal table definition.

use super::DbResult;
use rusqlite::Connection;

pub const JOURNAL_TABLE: &str = "journal";

/// Columns every journal table must carry, in declaration order.
pub const JOURNAL_COLUMNS: &[&str] = &["id", "entry", "minutes", "created_at"];

// `%f` yields `SS.SSS`; the literal `000` pads to microseconds so defaulted
// rows share the fixed width written by the core and sort lexically.
const CREATE_JOURNAL_SQL: &str = "
CREATE TABLE IF NOT EXISTS journal (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entry TEXT NOT NULL,
    minutes INTEGER NOT NULL CHECK (minutes >= 0),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%f000Z', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_journal_created_at
    ON journal (created_at DESC, id DESC);
";

/// Ensures the journal table and its ordering index exist.
///
/// Safe to call any number of times; existing rows are left untouched.
pub fn create_table_if_missing(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_JOURNAL_SQL)?;
    Ok(())
}
