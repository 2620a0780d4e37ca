//! Read-only analytics derived from stored mood entries.
//!
//! # Invariants
//! - Aggregations are pure; they never touch persistence.
//! - Input order is irrelevant; every output defines its own ordering.

pub mod aggregate;
