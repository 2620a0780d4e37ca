//! Mood logging use-case service.
//!
//! # Responsibility
//! - Turn raw form submissions into persisted entries.
//! - Serve history and insights views from one store snapshot.
//!
//! # Invariants
//! - Invalid submissions are rejected before the store is touched.
//! - Timestamps come from the injected `Clock`, never from the caller.

use crate::insights::aggregate::{recent, InsightsSnapshot};
use crate::model::entry::{EntryValidationError, MoodEntry, MoodSubmission};
use crate::repo::entry_store::{EntryStore, StoreError};
use crate::repo::kv_store::KeyValueStore;
use crate::service::clock::Clock;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for mood logging.
#[derive(Debug)]
pub enum MoodServiceError {
    Validation(EntryValidationError),
    Store(StoreError),
}

impl Display for MoodServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MoodServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for MoodServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for MoodServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case service over a shared `EntryStore`.
pub struct MoodService<'s, S: KeyValueStore, C: Clock> {
    store: &'s EntryStore<S>,
    clock: C,
}

impl<'s, S: KeyValueStore, C: Clock> MoodService<'s, S, C> {
    pub fn new(store: &'s EntryStore<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Validates, stamps and persists one submission.
    ///
    /// # Errors
    /// - `Validation` when mood or activity is missing or unrecognized.
    /// - `Store` when the append fails; nothing is persisted then.
    pub fn log_mood(&self, submission: MoodSubmission) -> Result<MoodEntry, MoodServiceError> {
        let entry = match submission.into_entry(self.clock.now()) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("event=mood_log module=service status=rejected error={err}");
                return Err(err.into());
            }
        };

        self.store.append_entry(&entry)?;
        info!(
            "event=mood_log module=service status=ok mood={} activity={} with_company={}",
            entry.mood,
            entry.activity,
            entry.has_company()
        );
        Ok(entry)
    }

    /// Entries newest first; `None` returns the full history.
    ///
    /// # Errors
    /// `Store` when the collection is unreadable, so callers can tell a
    /// corrupt history from an empty one.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<MoodEntry>, MoodServiceError> {
        let entries = self.store.try_list_entries().map_err(|err| {
            warn!("event=mood_history module=service status=degraded error={err}");
            MoodServiceError::from(err)
        })?;
        let limit = limit.unwrap_or(entries.len());
        Ok(recent(&entries, limit))
    }

    /// Builds every insights view from one read of the store.
    pub fn insights(&self, recent_limit: usize) -> InsightsSnapshot {
        InsightsSnapshot::build(&self.store.list_entries(), recent_limit)
    }
}
