//! Domain model for mood logging and reminder preferences.
//!
//! # Responsibility
//! - Define the canonical records persisted by `EntryStore`.
//! - Own parsing/validation of values coming from the presentation layer.
//!
//! # Invariants
//! - A `MoodEntry` is immutable after creation; only appends are modeled.
//! - A `WakingWindow` always satisfies `wake_time < bed_time`.

pub mod entry;
pub mod window;
