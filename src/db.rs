//! Persistent observation storage.
//!
//! [`ObservationStore`] owns the `weather` table and its uniqueness rule: at
//! most one row per timestamp. Every write goes through
//! [`ObservationStore::try_insert`], which is atomic for all callers.

pub mod query;
pub mod sqlite;

pub use query::QueryRows;
pub use sqlite::ObservationStore;

/// Layout of the `date` column. Lexicographic order is chronological order.
pub const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Result of offering one observation to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}
