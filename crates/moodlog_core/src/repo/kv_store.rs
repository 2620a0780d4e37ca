//! Durable key-value persistence collaborator.
//!
//! # Responsibility
//! - Store textual payloads under logical names.
//! - Provide multi-key reads/writes that are atomic as a group.
//!
//! # Invariants
//! - `put` replaces the whole value for a key; there are no partial writes.
//! - `put_many` commits every pair or none.
//! - The SQLite connection is only touched while holding its mutex.

use crate::db::DbError;
use crate::repo::entry_store::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::sync::{Mutex, MutexGuard};

const UPSERT_SQL: &str = "INSERT INTO kv_store (key, value, updated_at)
     VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";

const SELECT_SQL: &str = "SELECT value FROM kv_store WHERE key = ?1;";

/// Key-value persistence contract used by `EntryStore`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Reads several keys from one consistent snapshot, in input order.
    fn get_many(&self, keys: &[&str]) -> StoreResult<Vec<Option<String>>>;
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Writes several keys in one transaction.
    fn put_many(&self, pairs: &[(&str, &str)]) -> StoreResult<()>;
}

/// SQLite-backed key-value store over the `kv_store` table.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned("kv_store"))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(SELECT_SQL, [key], |row| row.get::<_, String>(0))
            .optional()
            .map_err(DbError::from)?;
        Ok(value)
    }

    fn get_many(&self, keys: &[&str]) -> StoreResult<Vec<Option<String>>> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(DbError::from)?;
        let mut values = Vec::with_capacity(keys.len());
        {
            let mut stmt = tx.prepare(SELECT_SQL).map_err(DbError::from)?;
            for key in keys {
                let value = stmt
                    .query_row([*key], |row| row.get::<_, String>(0))
                    .optional()
                    .map_err(DbError::from)?;
                values.push(value);
            }
        }
        tx.commit().map_err(DbError::from)?;
        Ok(values)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(UPSERT_SQL, params![key, value])
            .map_err(DbError::from)?;
        Ok(())
    }

    fn put_many(&self, pairs: &[(&str, &str)]) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        for (key, value) in pairs {
            tx.execute(UPSERT_SQL, params![key, value])
                .map_err(DbError::from)?;
        }
        tx.commit().map_err(DbError::from)?;
        Ok(())
    }
}
