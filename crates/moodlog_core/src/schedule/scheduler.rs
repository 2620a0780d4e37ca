//! Reminder scheduling against the notification collaborator.
//!
//! # Responsibility
//! - Replace the whole daily reminder set whenever the waking window changes.
//!
//! # Invariants
//! - Every reschedule cancels all prior reminders before registering new
//!   ones, so repeated calls never accumulate duplicates.
//! - Cancellation is the commit point. A failure before it leaves the prior
//!   schedule intact; a failure after it is reported without rollback or
//!   retry, leaving only the reminders registered so far.
//! - No two registered triggers share an hour and minute.

use crate::model::window::{TimeOfDay, WakingWindow};
use crate::schedule::notify::{DeliveryError, NotificationSink, ReminderPayload};
use crate::schedule::planner::{plan_reminders, PlanError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reminders per day when the user has not chosen otherwise.
pub const DEFAULT_REMINDER_COUNT: usize = 5;

/// Reminder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettings {
    pub count: usize,
    pub payload: ReminderPayload,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            count: DEFAULT_REMINDER_COUNT,
            payload: ReminderPayload::default(),
        }
    }
}

/// Collaborator call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStage {
    Cancel,
    Register,
}

impl DeliveryStage {
    fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Register => "register",
        }
    }
}

/// Reschedule errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Planning failed; the collaborator was not called.
    Plan(PlanError),
    /// The notification platform refused a call.
    ///
    /// `registered` counts reminders active after the failure: zero when the
    /// cancel step succeeded and the first registration failed.
    DeliveryUnavailable {
        stage: DeliveryStage,
        registered: usize,
        cause: DeliveryError,
    },
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plan(err) => write!(f, "{err}"),
            Self::DeliveryUnavailable {
                stage,
                registered,
                cause,
            } => write!(
                f,
                "reminder delivery unavailable at {} step ({registered} registered): {cause}",
                stage.as_str()
            ),
        }
    }
}

impl Error for SchedulerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Plan(err) => Some(err),
            Self::DeliveryUnavailable { cause, .. } => Some(cause),
        }
    }
}

impl From<PlanError> for SchedulerError {
    fn from(value: PlanError) -> Self {
        Self::Plan(value)
    }
}

/// Drives a `NotificationSink` with planned reminder times.
pub struct ReminderScheduler<N: NotificationSink> {
    sink: N,
    settings: ReminderSettings,
}

impl<N: NotificationSink> ReminderScheduler<N> {
    pub fn new(sink: N) -> Self {
        Self::with_settings(sink, ReminderSettings::default())
    }

    pub fn with_settings(sink: N, settings: ReminderSettings) -> Self {
        Self { sink, settings }
    }

    pub fn settings(&self) -> &ReminderSettings {
        &self.settings
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Replaces all scheduled reminders with the plan for `window`.
    ///
    /// Returns the registered times of day on success. Planned times that
    /// fall on the same minute are registered once.
    ///
    /// # Errors
    /// - `Plan` when the configured count is unsupported.
    /// - `DeliveryUnavailable` when the collaborator refuses a call; see the
    ///   module invariants for what stays scheduled.
    pub fn reschedule_all(&self, window: &WakingWindow) -> Result<Vec<TimeOfDay>, SchedulerError> {
        let mut times = plan_reminders(window, self.settings.count).map_err(|err| {
            error!("event=reminder_reschedule module=scheduler status=error error_code=plan_failed error={err}");
            SchedulerError::from(err)
        })?;
        // Windows shorter than `count - 1` minutes plan repeated minutes.
        times.dedup();

        if let Err(cause) = self.sink.cancel_all() {
            error!(
                "event=reminder_reschedule module=scheduler status=error error_code=cancel_failed error={cause}"
            );
            return Err(SchedulerError::DeliveryUnavailable {
                stage: DeliveryStage::Cancel,
                registered: 0,
                cause,
            });
        }

        for (registered, time) in times.iter().enumerate() {
            if let Err(cause) =
                self.sink
                    .schedule_recurring_daily(time.hour(), time.minute(), &self.settings.payload)
            {
                error!(
                    "event=reminder_reschedule module=scheduler status=error error_code=register_failed registered={registered} planned={} error={cause}",
                    times.len()
                );
                return Err(SchedulerError::DeliveryUnavailable {
                    stage: DeliveryStage::Register,
                    registered,
                    cause,
                });
            }
        }

        info!(
            "event=reminder_reschedule module=scheduler status=ok count={} wake={} bed={}",
            times.len(),
            window.wake_time(),
            window.bed_time()
        );
        Ok(times)
    }
}
