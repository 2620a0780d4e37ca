//! Notification-delivery collaborator contract.
//!
//! # Responsibility
//! - Describe the platform primitive that registers daily local reminders.
//! - Provide an in-memory sink that hands triggers to an outer runtime.
//!
//! # Invariants
//! - Triggers recur every day at hour:minute; they carry no calendar date.
//! - `ReminderScheduler` is the only caller of a sink.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Content shown when a reminder fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPayload {
    /// Android notification channel.
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub sound: bool,
}

impl Default for ReminderPayload {
    fn default() -> Self {
        Self {
            channel_id: "mood-reminders".to_string(),
            title: "Mood Check 🧠".to_string(),
            body: "How are you feeling right now? Tap to log your mood.".to_string(),
            sound: true,
        }
    }
}

/// Failure reported by the notification platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    PermissionDenied,
    Platform(String),
}

impl Display for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "notification permission denied"),
            Self::Platform(message) => write!(f, "notification platform failure: {message}"),
        }
    }
}

impl Error for DeliveryError {}

/// Local notification scheduling primitive.
pub trait NotificationSink {
    /// Cancels every reminder previously registered by this app.
    fn cancel_all(&self) -> Result<(), DeliveryError>;

    /// Registers one reminder repeating daily at `hour:minute` local time.
    fn schedule_recurring_daily(
        &self,
        hour: u8,
        minute: u8,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError>;
}

/// One active daily trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrigger {
    pub hour: u8,
    pub minute: u8,
    pub payload: ReminderPayload,
}

/// Sink that keeps the active trigger set in memory.
///
/// Used where the platform call happens outside this crate: the outer
/// runtime reads `active_triggers()` after a reschedule and mirrors them.
#[derive(Debug, Default)]
pub struct CollectingSink {
    triggers: Mutex<Vec<DailyTrigger>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of currently registered triggers, in registration order.
    pub fn active_triggers(&self) -> Vec<DailyTrigger> {
        match self.triggers.lock() {
            Ok(triggers) => triggers.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationSink for CollectingSink {
    fn cancel_all(&self) -> Result<(), DeliveryError> {
        self.triggers
            .lock()
            .map_err(|_| DeliveryError::Platform("trigger buffer lock poisoned".to_string()))?
            .clear();
        Ok(())
    }

    fn schedule_recurring_daily(
        &self,
        hour: u8,
        minute: u8,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError> {
        self.triggers
            .lock()
            .map_err(|_| DeliveryError::Platform("trigger buffer lock poisoned".to_string()))?
            .push(DailyTrigger {
                hour,
                minute,
                payload: payload.clone(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectingSink, NotificationSink, ReminderPayload};

    #[test]
    fn cancel_all_clears_collected_triggers() {
        let sink = CollectingSink::new();
        let payload = ReminderPayload::default();
        sink.schedule_recurring_daily(8, 0, &payload)
            .expect("schedule should succeed");
        sink.schedule_recurring_daily(12, 30, &payload)
            .expect("schedule should succeed");
        assert_eq!(sink.active_triggers().len(), 2);

        sink.cancel_all().expect("cancel should succeed");
        assert!(sink.active_triggers().is_empty());
    }

    #[test]
    fn default_payload_targets_mood_channel() {
        let payload = ReminderPayload::default();
        assert_eq!(payload.channel_id, "mood-reminders");
        assert!(payload.sound);
    }
}
