//! Typed repository for mood entries and the waking window.
//!
//! # Responsibility
//! - Own the durable mood-entry collection and the single waking window.
//! - Serialize both to textual payloads under fixed logical keys.
//!
//! # Invariants
//! - Writes are serialized by one in-process lock, so two rapid appends can
//!   never overwrite each other's read-modify-write.
//! - A write returns `Ok` only after the backend committed it.
//! - Corrupt payloads degrade reads to empty. An append over one moves the
//!   raw bytes to a backup key and starts a fresh collection in the same
//!   transaction, so malformed data is never dropped.
//! - Entries persisted without an id get a deterministic one on every read.

use crate::db::DbError;
use crate::model::entry::MoodEntry;
use crate::model::window::{TimeOfDay, WakingWindow};
use crate::repo::kv_store::KeyValueStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

const ENTRIES_KEY: &str = "moodEntries";
const WAKE_TIME_KEY: &str = "wakeUpTime";
const BED_TIME_KEY: &str = "bedTime";
const CORRUPT_BACKUP_PREFIX: &str = "moodEntries.corrupt.";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence errors surfaced by the entry store.
#[derive(Debug)]
pub enum StoreError {
    /// Backend I/O failure.
    Backend(DbError),
    /// Persisted payload under `key` could not be parsed.
    Corrupt { key: &'static str, message: String },
    /// In-memory value could not be encoded.
    Encode(String),
    /// A previous holder of the named lock panicked.
    LockPoisoned(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "{err}"),
            Self::Corrupt { key, message } => {
                write!(f, "persisted `{key}` payload is corrupt: {message}")
            }
            Self::Encode(message) => write!(f, "failed to encode payload: {message}"),
            Self::LockPoisoned(name) => write!(f, "{name} lock is poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            Self::Corrupt { .. } | Self::Encode(_) | Self::LockPoisoned(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Backend(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(DbError::Sqlite(value))
    }
}

/// Durable store for mood entries and user preferences.
pub struct EntryStore<S: KeyValueStore> {
    kv: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> EntryStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// Appends one entry to the persisted collection.
    ///
    /// When the existing collection cannot be parsed, its raw payload is
    /// moved to `moodEntries.corrupt.<entry timestamp ms>` and the collection
    /// restarts with `entry`; both writes commit together.
    ///
    /// # Errors
    /// `Backend` / `Encode` / `LockPoisoned` on I/O, encoding or lock
    /// failure. Nothing is written then.
    pub fn append_entry(&self, entry: &MoodEntry) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("entry_store"))?;

        let stored = match self.read_entries() {
            Ok(stored) => stored,
            Err(err) => {
                error!(
                    "event=entry_append module=store status=error error_code=load_failed error={err}"
                );
                return Err(err);
            }
        };

        match stored {
            StoredEntries::Parsed(mut entries) => {
                entries.push(entry.clone());
                let payload = encode_entries(&entries)?;
                if let Err(err) = self.kv.put(ENTRIES_KEY, &payload) {
                    error!(
                        "event=entry_append module=store status=error error_code=write_failed error={err}"
                    );
                    return Err(err);
                }
                info!(
                    "event=entry_append module=store status=ok entry_count={}",
                    entries.len()
                );
            }
            StoredEntries::Corrupt { raw, cause } => {
                let backup_key = corrupt_backup_key(entry);
                let payload = encode_entries(std::slice::from_ref(entry))?;
                if let Err(err) = self.kv.put_many(&[
                    (backup_key.as_str(), raw.as_str()),
                    (ENTRIES_KEY, payload.as_str()),
                ]) {
                    error!(
                        "event=entry_append module=store status=error error_code=recover_failed error={err}"
                    );
                    return Err(err);
                }
                warn!(
                    "event=entry_append module=store status=recovered backup_key={backup_key} entry_count=1 cause={cause}"
                );
            }
        }
        Ok(())
    }

    /// Returns every stored entry in append order.
    ///
    /// Failures degrade to an empty list; use `try_list_entries` to observe
    /// them.
    pub fn list_entries(&self) -> Vec<MoodEntry> {
        match self.load_entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("event=entry_list module=store status=degraded error={err}");
                Vec::new()
            }
        }
    }

    /// Returns every stored entry in append order, surfacing failures.
    pub fn try_list_entries(&self) -> StoreResult<Vec<MoodEntry>> {
        self.load_entries()
    }

    /// Returns the saved waking window, or `None` when unset or unreadable.
    pub fn get_waking_window(&self) -> Option<WakingWindow> {
        match self.try_get_waking_window() {
            Ok(window) => window,
            Err(err) => {
                warn!("event=window_get module=store status=degraded error={err}");
                None
            }
        }
    }

    /// Returns the saved waking window, surfacing corrupt or partial state.
    pub fn try_get_waking_window(&self) -> StoreResult<Option<WakingWindow>> {
        let values = self.kv.get_many(&[WAKE_TIME_KEY, BED_TIME_KEY])?;
        let (wake_raw, bed_raw) = match values.as_slice() {
            [None, None] => return Ok(None),
            [Some(wake), Some(bed)] => (wake.as_str(), bed.as_str()),
            _ => {
                return Err(StoreError::Corrupt {
                    key: WAKE_TIME_KEY,
                    message: "wake and bed times must be stored together".to_string(),
                })
            }
        };

        let wake_time = parse_time(WAKE_TIME_KEY, wake_raw)?;
        let bed_time = parse_time(BED_TIME_KEY, bed_raw)?;
        let window = WakingWindow::new(wake_time, bed_time).map_err(|err| StoreError::Corrupt {
            key: BED_TIME_KEY,
            message: err.to_string(),
        })?;
        Ok(Some(window))
    }

    /// Replaces the saved waking window. Both times commit together.
    pub fn set_waking_window(&self, window: &WakingWindow) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("entry_store"))?;

        let wake = window.wake_time().to_string();
        let bed = window.bed_time().to_string();
        self.kv
            .put_many(&[(WAKE_TIME_KEY, wake.as_str()), (BED_TIME_KEY, bed.as_str())])?;

        info!("event=window_set module=store status=ok wake={wake} bed={bed}");
        Ok(())
    }

    fn load_entries(&self) -> StoreResult<Vec<MoodEntry>> {
        match self.read_entries()? {
            StoredEntries::Parsed(entries) => Ok(entries),
            StoredEntries::Corrupt { cause, .. } => Err(cause),
        }
    }

    fn read_entries(&self) -> StoreResult<StoredEntries> {
        let Some(raw) = self.kv.get(ENTRIES_KEY)? else {
            return Ok(StoredEntries::Parsed(Vec::new()));
        };
        if raw.trim().is_empty() {
            return Ok(StoredEntries::Parsed(Vec::new()));
        }

        match serde_json::from_str::<Vec<MoodEntry>>(&raw) {
            Ok(mut entries) => {
                for (index, entry) in entries.iter_mut().enumerate() {
                    entry.assign_legacy_id(index);
                }
                Ok(StoredEntries::Parsed(entries))
            }
            Err(err) => Ok(StoredEntries::Corrupt {
                raw,
                cause: StoreError::Corrupt {
                    key: ENTRIES_KEY,
                    message: err.to_string(),
                },
            }),
        }
    }
}

/// Entry collection as found under `moodEntries`.
enum StoredEntries {
    Parsed(Vec<MoodEntry>),
    Corrupt { raw: String, cause: StoreError },
}

fn encode_entries(entries: &[MoodEntry]) -> StoreResult<String> {
    serde_json::to_string(entries).map_err(|err| StoreError::Encode(err.to_string()))
}

/// Backup key for a corrupt collection replaced by `entry`.
pub fn corrupt_backup_key(entry: &MoodEntry) -> String {
    format!(
        "{CORRUPT_BACKUP_PREFIX}{}",
        entry.timestamp.timestamp_millis()
    )
}

fn parse_time(key: &'static str, raw: &str) -> StoreResult<TimeOfDay> {
    raw.parse::<TimeOfDay>()
        .map_err(|err| StoreError::Corrupt {
            key,
            message: err.to_string(),
        })
}
