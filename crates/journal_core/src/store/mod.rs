//! Storage port for journal entries and its implementations.
//!
//! # Responsibility
//! - Define the append/list contract the entry log depends on.
//! - Keep SQL and in-memory details out of the service layer.
//!
//! # Invariants
//! - Listings are ordered by `created_at DESC, id DESC`.
//! - Stores do not re-validate submissions; `NewEntry` already did.
//! - Stores hold no cache that could make a listing stale.

use crate::db::DbError;
use crate::model::entry::{Entry, NewEntry};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by an `EntryStore` implementation.
#[derive(Debug)]
pub enum StoreError {
    /// Backend unreachable or rejected the connection.
    Connection(String),
    /// A statement failed on an otherwise healthy connection.
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A persisted row could not be decoded.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(message) => write!(f, "storage unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        if value.is_connection_failure() {
            Self::Connection(value.to_string())
        } else {
            Self::Db(value)
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}

/// Persistence contract consumed by `EntryLog`.
///
/// A hosted backend plugs in by implementing this trait.
pub trait EntryStore {
    /// Appends one entry stamped with `created_at` and returns it with its
    /// assigned id.
    fn insert(&self, entry: &NewEntry, created_at: DateTime<Utc>) -> StoreResult<Entry>;

    /// Returns every entry, most recent first.
    fn list_newest_first(&self) -> StoreResult<Vec<Entry>>;
}

impl<S: EntryStore + ?Sized> EntryStore for &S {
    fn insert(&self, entry: &NewEntry, created_at: DateTime<Utc>) -> StoreResult<Entry> {
        (**self).insert(entry, created_at)
    }

    fn list_newest_first(&self) -> StoreResult<Vec<Entry>> {
        (**self).list_newest_first()
    }
}
