//! Audit logging for FeeDesk
//!
//! Every record that is created or changed (students, fee items, payments,
//! terms, users) is written to an append-only JSON-lines log with its
//! before/after values.
//!
//! - `AuditEntry`: one log line
//! - `AuditLogger`: appends to and reads back the log file
//! - `generate_diff`: top-level field changes between two snapshots

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
