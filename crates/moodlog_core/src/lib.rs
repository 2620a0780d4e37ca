//! Core domain logic for MoodLog.
//! This crate is the single source of truth for entry, reminder and
//! insights invariants.

pub mod db;
pub mod insights;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use insights::aggregate::{
    activity_counts, average_score, mood_counts, recent, time_series, ActivityCounts,
    InsightsSnapshot, MoodPoint, RECENT_ENTRIES_DEFAULT,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{Activity, EntryId, EntryValidationError, Mood, MoodEntry, MoodSubmission};
pub use model::window::{InvalidWindow, TimeOfDay, TimeParseError, WakingWindow};
pub use repo::entry_store::{corrupt_backup_key, EntryStore, StoreError, StoreResult};
pub use repo::kv_store::{KeyValueStore, SqliteKeyValueStore};
pub use schedule::notify::{
    CollectingSink, DailyTrigger, DeliveryError, NotificationSink, ReminderPayload,
};
pub use schedule::planner::{plan_reminders, plan_reminders_between, PlanError};
pub use schedule::scheduler::{
    DeliveryStage, ReminderScheduler, ReminderSettings, SchedulerError, DEFAULT_REMINDER_COUNT,
};
pub use service::clock::{Clock, SystemClock};
pub use service::mood_service::{MoodService, MoodServiceError};
pub use service::reminder_service::{ReminderService, ReminderServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
