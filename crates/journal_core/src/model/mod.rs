//! Domain model for journal entries.
//!
//! # Responsibility
//! - Define the persisted `Entry` record and the validated `NewEntry` submission.
//!
//! # Invariants
//! - Entries are append-only: created once, never updated or deleted.
//! - `created_at` is always UTC.

pub mod entry;
