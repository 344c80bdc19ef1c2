//! Core domain logic for the journal tracker.
//! This crate is the single source of truth for entry invariants.

pub mod config;
pub mod db;
pub mod display;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod view;

pub use config::{AppConfig, ConfigChain, ConfigError, StoreBackend};
pub use display::{format_created_at, parse_utc_offset, DisplaySettings};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::entry::{Entry, EntryId, EntryValidationError, NewEntry};
pub use service::entry_log::{
    sum_minutes, Clock, EntryLog, EntryLogError, EntryLogSnapshot, SystemClock,
};
pub use store::memory::MemoryEntryStore;
pub use store::sqlite::SqliteEntryStore;
pub use store::{EntryStore, StoreError, StoreResult};
pub use view::{EntryRow, JournalView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
