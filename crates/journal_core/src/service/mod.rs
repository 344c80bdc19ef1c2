//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage calls into the journal use-cases.
//! - Keep UI layers decoupled from storage details.

pub mod entry_log;
