//! Repository layer: typed persistence over a key-value collaborator.
//!
//! # Responsibility
//! - Hide the underlying key scheme behind `EntryStore`.
//! - Isolate SQLite details inside `SqliteKeyValueStore`.
//!
//! # Invariants
//! - Every write goes through `EntryStore`'s write lock.
//! - Corrupt payloads are reported and backed up, never silently dropped.

pub mod entry_store;
pub mod kv_store;
