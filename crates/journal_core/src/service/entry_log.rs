//! Entry log use-case service.
//!
//! # Responsibility
//! - Validate submissions and stamp them with the current UTC instant.
//! - Fetch the full entry list and derive the minutes total from it.
//!
//! # Invariants
//! - Invalid submissions never reach the store.
//! - Every read is a fresh store fetch; nothing is cached between calls.
//! - The total is always the sum over the listing it was derived from.

use crate::model::entry::{Entry, EntryValidationError, NewEntry};
use crate::store::{EntryStore, StoreError};
use chrono::{DateTime, SubsecRound, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

// Stored timestamps carry microseconds; stamping at the same precision keeps
// the entry returned by `add` identical to the one listed afterwards.
const TIMESTAMP_SUBSEC_DIGITS: u16 = 6;

/// Source of the creation instant for new entries.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Request-scoped failure of an entry log operation.
#[derive(Debug)]
pub enum EntryLogError {
    /// Submission rejected before storage was touched.
    Validation(EntryValidationError),
    /// The append failed; nothing was retained.
    Write(StoreError),
    /// The listing failed.
    Read(StoreError),
    /// The minutes total does not fit in an `i64`.
    TotalOverflow,
}

impl EntryLogError {
    /// Short message suitable for showing in place of the normal view.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => format!("Entry not added: {err}."),
            Self::Write(StoreError::Connection(_)) | Self::Read(StoreError::Connection(_)) => {
                "Could not reach the journal database.".to_string()
            }
            Self::Write(_) => "Could not save the entry. Please submit it again.".to_string(),
            Self::Read(_) => "Could not load journal entries.".to_string(),
            Self::TotalOverflow => "Total minutes is too large to display.".to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Write(_) => "store_write_failed",
            Self::Read(_) => "store_read_failed",
            Self::TotalOverflow => "total_overflow",
        }
    }
}

impl Display for EntryLogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid entry: {err}"),
            Self::Write(err) => write!(f, "failed to save entry: {err}"),
            Self::Read(err) => write!(f, "failed to load entries: {err}"),
            Self::TotalOverflow => write!(f, "minutes total overflows i64"),
        }
    }
}

impl Error for EntryLogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Write(err) | Self::Read(err) => Some(err),
            Self::TotalOverflow => None,
        }
    }
}

impl From<EntryValidationError> for EntryLogError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Entries plus their total, taken from one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryLogSnapshot {
    /// Most recent first.
    pub entries: Vec<Entry>,
    pub total_minutes: i64,
}

/// Session-scoped journal facade over a store.
pub struct EntryLog<S: EntryStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: EntryStore> EntryLog<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: EntryStore, C: Clock> EntryLog<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Validates and appends one entry.
    ///
    /// # Errors
    /// - `Validation` for a blank task or negative minutes; storage untouched.
    /// - `Write` when the store rejects the append. No retry is attempted.
    pub fn add(&self, task: &str, minutes: i64) -> Result<Entry, EntryLogError> {
        let started_at = Instant::now();
        let result = NewEntry::new(task, minutes)
            .map_err(EntryLogError::from)
            .and_then(|entry| {
                let created_at = self.clock.now().trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS);
                self.store
                    .insert(&entry, created_at)
                    .map_err(EntryLogError::Write)
            });

        match &result {
            Ok(entry) => info!(
                "event=entry_add module=service status=ok entry_id={} minutes={} duration_ms={}",
                entry.id,
                entry.minutes,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=entry_add module=service status=error error_code={} duration_ms={} error={}",
                err.code(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Returns every entry, most recent first. Empty when nothing is logged.
    pub fn list_all(&self) -> Result<Vec<Entry>, EntryLogError> {
        let started_at = Instant::now();
        match self.store.list_newest_first() {
            Ok(entries) => {
                info!(
                    "event=entry_list module=service status=ok count={} duration_ms={}",
                    entries.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(entries)
            }
            Err(err) => {
                let err = EntryLogError::Read(err);
                warn!(
                    "event=entry_list module=service status=error error_code={} duration_ms={} error={}",
                    err.code(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Sum of minutes over a fresh listing.
    ///
    /// # Errors
    /// - `Read` when the listing fails.
    /// - `TotalOverflow` when the sum exceeds `i64::MAX`.
    pub fn total_minutes(&self) -> Result<i64, EntryLogError> {
        let entries = self.list_all()?;
        sum_minutes(&entries).ok_or(EntryLogError::TotalOverflow)
    }

    /// Listing and total from a single fetch.
    pub fn snapshot(&self) -> Result<EntryLogSnapshot, EntryLogError> {
        let entries = self.list_all()?;
        let total_minutes = sum_minutes(&entries).ok_or(EntryLogError::TotalOverflow)?;
        Ok(EntryLogSnapshot {
            entries,
            total_minutes,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Total minutes across `entries`; `Some(0)` when empty, `None` on overflow.
pub fn sum_minutes(entries: &[Entry]) -> Option<i64> {
    entries
        .iter()
        .try_fold(0_i64, |total, entry| total.checked_add(entry.minutes))
}
