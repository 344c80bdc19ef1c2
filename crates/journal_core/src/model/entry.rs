//! Entry domain model.
//!
//! # Responsibility
//! - Define the canonical logged-activity record.
//! - Validate user submissions before they reach storage.
//!
//! # Invariants
//! - `minutes >= 0` for every persisted entry.
//! - `task` is non-empty after trimming whitespace.
//! - `id` and `created_at` are assigned once and never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned surrogate identifier.
pub type EntryId = i64;

/// One logged activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Assigned by storage on insert.
    pub id: EntryId,
    /// What was done. Trimmed, never empty.
    pub task: String,
    /// Time spent.
    pub minutes: i64,
    /// Insert instant in UTC. Sole sort key for listings.
    pub created_at: DateTime<Utc>,
}

/// Validation failures raised before a submission reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyTask,
    NegativeMinutes(i64),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTask => write!(f, "task must not be empty"),
            Self::NegativeMinutes(value) => {
                write!(f, "minutes must be zero or greater, got {value}")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// A validated submission that has not been persisted yet.
///
/// Fields are private so the only way to build one is through [`NewEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    task: String,
    minutes: i64,
}

impl NewEntry {
    /// Validates raw form input.
    ///
    /// # Errors
    /// - `EmptyTask` when `task` is empty or whitespace only.
    /// - `NegativeMinutes` when `minutes < 0`.
    pub fn new(task: &str, minutes: i64) -> Result<Self, EntryValidationError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(EntryValidationError::EmptyTask);
        }
        if minutes < 0 {
            return Err(EntryValidationError::NegativeMinutes(minutes));
        }

        Ok(Self {
            task: task.to_string(),
            minutes,
        })
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Attaches storage-assigned identity, producing the persisted shape.
    pub fn into_entry(self, id: EntryId, created_at: DateTime<Utc>) -> Entry {
        Entry {
            id,
            task: self.task,
            minutes: self.minutes,
            created_at,
        }
    }
}
