//! Waking-hours and reminder use-case service.
//!
//! # Responsibility
//! - Persist waking-hour changes and re-plan reminders from them.
//! - Restore the reminder schedule at app start.
//!
//! # Invariants
//! - The window is persisted before reminders are rescheduled; a failed
//!   save never touches the notification collaborator.

use crate::model::window::{TimeOfDay, WakingWindow};
use crate::repo::entry_store::{EntryStore, StoreError};
use crate::repo::kv_store::KeyValueStore;
use crate::schedule::notify::NotificationSink;
use crate::schedule::scheduler::{ReminderScheduler, SchedulerError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for waking-hours updates.
#[derive(Debug)]
pub enum ReminderServiceError {
    Store(StoreError),
    Scheduler(SchedulerError),
}

impl Display for ReminderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Scheduler(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReminderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Scheduler(err) => Some(err),
        }
    }
}

impl From<StoreError> for ReminderServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SchedulerError> for ReminderServiceError {
    fn from(value: SchedulerError) -> Self {
        Self::Scheduler(value)
    }
}

/// Couples the waking-window preference with the reminder schedule.
pub struct ReminderService<'s, S: KeyValueStore, N: NotificationSink> {
    store: &'s EntryStore<S>,
    scheduler: ReminderScheduler<N>,
}

impl<'s, S: KeyValueStore, N: NotificationSink> ReminderService<'s, S, N> {
    pub fn new(store: &'s EntryStore<S>, scheduler: ReminderScheduler<N>) -> Self {
        Self { store, scheduler }
    }

    pub fn scheduler(&self) -> &ReminderScheduler<N> {
        &self.scheduler
    }

    /// Saved window, or the default one when none is stored.
    pub fn current_window(&self) -> WakingWindow {
        self.store.get_waking_window().unwrap_or_default()
    }

    /// Saves `window` and replaces the reminder schedule with its plan.
    ///
    /// # Errors
    /// - `Store` when saving fails; reminders stay as they were.
    /// - `Scheduler` when delivery fails after the window was saved.
    pub fn update_waking_hours(
        &self,
        window: &WakingWindow,
    ) -> Result<Vec<TimeOfDay>, ReminderServiceError> {
        self.store.set_waking_window(window)?;
        let times = self.scheduler.reschedule_all(window)?;
        info!(
            "event=waking_hours_update module=service status=ok reminders={}",
            times.len()
        );
        Ok(times)
    }

    /// Re-plans reminders from the stored (or default) window.
    pub fn restore_schedule(&self) -> Result<Vec<TimeOfDay>, ReminderServiceError> {
        let window = self.current_window();
        Ok(self.scheduler.reschedule_all(&window)?)
    }
}
