//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Hand reminder triggers to the mobile runtime, which owns delivery.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide `EntryStore` serves every call, so all writes share
//!   one write lock.
//! - Timestamps cross the boundary as epoch milliseconds (UTC).

use log::error;
use moodlog_core::db::open_db;
use moodlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Activity, CollectingSink, DailyTrigger, EntryStore, InsightsSnapshot, KeyValueStore, Mood,
    MoodEntry, MoodService, MoodSubmission, ReminderScheduler, ReminderService,
    SqliteKeyValueStore, SystemClock, TimeOfDay, WakingWindow, RECENT_ENTRIES_DEFAULT,
};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

const HISTORY_DEFAULT_LIMIT: u32 = 50;
const HISTORY_LIMIT_MAX: u32 = 500;
const ENTRY_DB_FILE_NAME: &str = "moodlog.sqlite3";
const DB_PATH_ENV: &str = "MOODLOG_DB_PATH";

static ENTRY_STORE: OnceCell<EntryStore<SqliteKeyValueStore>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for mood submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created entry ID.
    pub entry_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, entry_id: String) -> Self {
        Self {
            ok: true,
            entry_id: Some(entry_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry_id: None,
            message: message.into(),
        }
    }
}

/// History row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntryItem {
    pub entry_id: String,
    /// Persisted mood label (`good|ok|bad` or a legacy raw value).
    pub mood: String,
    pub mood_score: u8,
    pub activity: String,
    pub people: String,
    pub note: String,
    pub timestamp_ms: i64,
}

/// History response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHistoryResponse {
    /// False when stored history could not be read; `items` is empty then.
    pub ok: bool,
    /// Entries newest first.
    pub items: Vec<MoodEntryItem>,
    pub message: String,
    pub applied_limit: u32,
}

/// One mood-trend chart point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodPointItem {
    pub timestamp_ms: i64,
    pub score: u8,
}

/// One activity-frequency bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCountItem {
    pub activity: String,
    pub label: String,
    pub count: u32,
}

/// One daily reminder the mobile runtime must register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTriggerItem {
    pub hour: u8,
    pub minute: u8,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub sound: bool,
}

/// Per-mood entry count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCountItem {
    pub mood: String,
    pub count: u32,
}

/// Summary figures for the insights screen.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightsSummaryResponse {
    pub entry_count: u32,
    /// Mean score over recognized moods; `None` without any.
    pub average_score: Option<f64>,
    /// Most logged activity; `None` without entries.
    pub top_activity: Option<String>,
    pub mood_counts: Vec<MoodCountItem>,
    /// Newest entries first.
    pub recent: Vec<MoodEntryItem>,
}

/// Waking-hours response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakingHoursResponse {
    pub ok: bool,
    /// Whether the user has saved waking hours. When false the times are the
    /// defaults and the shell should show the waking-hours screen first.
    pub configured: bool,
    /// `HH:MM`.
    pub wake_time: String,
    /// `HH:MM`.
    pub bed_time: String,
    /// Full replacement set: cancel every pending reminder, then register these.
    pub reminders: Vec<ReminderTriggerItem>,
    pub message: String,
}

/// Logs one mood from the logging form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Missing or unknown mood/activity is rejected with `ok=false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_log_mood(
    mood: Option<String>,
    activity: Option<String>,
    people: String,
    note: String,
) -> EntryActionResponse {
    let submission = MoodSubmission {
        mood,
        activity,
        people,
        note,
    };
    let result = entry_store().and_then(|store| {
        MoodService::new(store, SystemClock)
            .log_mood(submission)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(entry) => EntryActionResponse::success("Mood logged.", entry.id.to_string()),
        Err(err) => EntryActionResponse::failure(format!("entry_log_mood failed: {err}")),
    }
}

/// Returns mood history, newest first.
///
/// # FFI contract
/// - `limit=None|Some(0)` applies the default; larger values are capped.
/// - Unreadable storage yields `ok=false`, no items and a message.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_history(limit: Option<u32>) -> EntryHistoryResponse {
    let applied_limit = normalize_history_limit(limit);
    match entry_store() {
        Ok(store) => load_history(store, applied_limit),
        Err(err) => EntryHistoryResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_history failed: {err}"),
            applied_limit,
        },
    }
}

/// Mood-over-time series sorted ascending by timestamp.
#[flutter_rust_bridge::frb(sync)]
pub fn insights_mood_series() -> Vec<MoodPointItem> {
    let Ok(store) = entry_store() else {
        return Vec::new();
    };
    moodlog_core::time_series(&store.list_entries())
        .into_iter()
        .map(|point| MoodPointItem {
            timestamp_ms: point.timestamp.timestamp_millis(),
            score: point.score,
        })
        .collect()
}

/// Entry counts for every activity, zero-filled, in chart order.
#[flutter_rust_bridge::frb(sync)]
pub fn insights_activity_counts() -> Vec<ActivityCountItem> {
    let entries = entry_store()
        .map(|store| store.list_entries())
        .unwrap_or_default();
    moodlog_core::activity_counts(&entries)
        .iter()
        .map(|(activity, count)| to_activity_item(activity, count))
        .collect()
}

/// Average, top activity, mood counts and recent entries for the insights
/// screen. Unreadable storage reads as no entries.
#[flutter_rust_bridge::frb(sync)]
pub fn insights_summary() -> InsightsSummaryResponse {
    let snapshot = match entry_store() {
        Ok(store) => MoodService::new(store, SystemClock).insights(RECENT_ENTRIES_DEFAULT),
        Err(_) => InsightsSnapshot::build(&[], RECENT_ENTRIES_DEFAULT),
    };
    to_summary(&snapshot)
}

/// Returns the saved (or default) waking hours with their reminder plan.
///
/// Does not persist anything; the plan is what `waking_hours_set` would
/// register for the current window.
#[flutter_rust_bridge::frb(sync)]
pub fn waking_hours_get() -> WakingHoursResponse {
    match entry_store() {
        Ok(store) => load_waking_hours(store),
        Err(err) => waking_hours_failure(format!("waking_hours_get failed: {err}")),
    }
}

/// Saves waking hours and returns the replacement reminder set.
///
/// Input semantics:
/// - `wake_time` / `bed_time`: `HH:MM` or `hh:mm AM|PM`.
/// - Bed time must be later than wake time on the same day.
///
/// # FFI contract
/// - On `ok=true` the mobile runtime must cancel all pending reminders and
///   register exactly `reminders`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn waking_hours_set(wake_time: String, bed_time: String) -> WakingHoursResponse {
    let window = match parse_window(&wake_time, &bed_time) {
        Ok(window) => window,
        Err(err) => return waking_hours_failure(format!("waking_hours_set failed: {err}")),
    };
    match entry_store() {
        Ok(store) => save_waking_hours(store, &window),
        Err(err) => waking_hours_failure(format!("waking_hours_set failed: {err}")),
    }
}

fn load_history<S: KeyValueStore>(
    store: &EntryStore<S>,
    applied_limit: u32,
) -> EntryHistoryResponse {
    match MoodService::new(store, SystemClock).history(Some(applied_limit as usize)) {
        Ok(entries) => {
            let message = if entries.is_empty() {
                "No mood entries yet.".to_string()
            } else {
                format!("Loaded {} entr(ies).", entries.len())
            };
            EntryHistoryResponse {
                ok: true,
                items: entries.iter().map(to_entry_item).collect(),
                message,
                applied_limit,
            }
        }
        Err(err) => EntryHistoryResponse {
            ok: false,
            items: Vec::new(),
            message: format!("Stored history is unreadable: {err}"),
            applied_limit,
        },
    }
}

fn load_waking_hours<S: KeyValueStore>(store: &EntryStore<S>) -> WakingHoursResponse {
    let saved = store.get_waking_window();
    let configured = saved.is_some();
    let window = saved.unwrap_or_default();
    let scheduler = ReminderScheduler::new(CollectingSink::new());
    match scheduler.reschedule_all(&window) {
        Ok(_) => waking_hours_success(
            &window,
            configured,
            scheduler.sink().active_triggers(),
            "Loaded.",
        ),
        Err(err) => waking_hours_failure(format!("waking_hours_get failed: {err}")),
    }
}

fn save_waking_hours<S: KeyValueStore>(
    store: &EntryStore<S>,
    window: &WakingWindow,
) -> WakingHoursResponse {
    let service = ReminderService::new(store, ReminderScheduler::new(CollectingSink::new()));
    match service.update_waking_hours(window) {
        Ok(_) => waking_hours_success(
            window,
            true,
            service.scheduler().sink().active_triggers(),
            "Waking hours saved.",
        ),
        Err(err) => waking_hours_failure(format!("waking_hours_set failed: {err}")),
    }
}

fn parse_window(wake_time: &str, bed_time: &str) -> Result<WakingWindow, String> {
    let wake = wake_time
        .parse::<TimeOfDay>()
        .map_err(|err| err.to_string())?;
    let bed = bed_time.parse::<TimeOfDay>().map_err(|err| err.to_string())?;
    WakingWindow::new(wake, bed).map_err(|err| err.to_string())
}

fn waking_hours_success(
    window: &WakingWindow,
    configured: bool,
    triggers: Vec<DailyTrigger>,
    message: &str,
) -> WakingHoursResponse {
    WakingHoursResponse {
        ok: true,
        configured,
        wake_time: window.wake_time().to_string(),
        bed_time: window.bed_time().to_string(),
        reminders: triggers.into_iter().map(to_trigger_item).collect(),
        message: message.to_string(),
    }
}

fn waking_hours_failure(message: String) -> WakingHoursResponse {
    WakingHoursResponse {
        ok: false,
        configured: false,
        wake_time: String::new(),
        bed_time: String::new(),
        reminders: Vec::new(),
        message,
    }
}

fn normalize_history_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => HISTORY_DEFAULT_LIMIT,
        Some(value) => value.min(HISTORY_LIMIT_MAX),
    }
}

fn resolve_entry_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
}

fn entry_store() -> Result<&'static EntryStore<SqliteKeyValueStore>, String> {
    ENTRY_STORE.get_or_try_init(|| {
        let conn = open_db(resolve_entry_db_path()).map_err(|err| {
            error!("event=ffi_store_open module=ffi status=error error={err}");
            format!("entry DB open failed: {err}")
        })?;
        Ok(EntryStore::new(SqliteKeyValueStore::new(conn)))
    })
}

fn to_entry_item(entry: &MoodEntry) -> MoodEntryItem {
    MoodEntryItem {
        entry_id: entry.id.to_string(),
        mood: entry.mood.to_string(),
        mood_score: entry.mood.score(),
        activity: entry.activity.to_string(),
        people: entry.people.clone(),
        note: entry.note.clone(),
        timestamp_ms: entry.timestamp.timestamp_millis(),
    }
}

fn to_activity_item(activity: Activity, count: usize) -> ActivityCountItem {
    ActivityCountItem {
        activity: activity.as_str().to_string(),
        label: activity.label().to_string(),
        count: u32::try_from(count).unwrap_or(u32::MAX),
    }
}

fn to_mood_count_item((mood, count): &(Mood, usize)) -> MoodCountItem {
    MoodCountItem {
        mood: mood.as_str().to_string(),
        count: u32::try_from(*count).unwrap_or(u32::MAX),
    }
}

fn to_summary(snapshot: &InsightsSnapshot) -> InsightsSummaryResponse {
    InsightsSummaryResponse {
        entry_count: u32::try_from(snapshot.series.len()).unwrap_or(u32::MAX),
        average_score: snapshot.average_score,
        top_activity: snapshot
            .top_activity
            .map(|activity| activity.as_str().to_string()),
        mood_counts: snapshot.mood_counts.iter().map(to_mood_count_item).collect(),
        recent: snapshot.recent.iter().map(to_entry_item).collect(),
    }
}

fn to_trigger_item(trigger: DailyTrigger) -> ReminderTriggerItem {
    ReminderTriggerItem {
        hour: trigger.hour,
        minute: trigger.minute,
        channel_id: trigger.payload.channel_id,
        title: trigger.payload.title,
        body: trigger.payload.body,
        sound: trigger.payload.sound,
    }
}
