use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use crate::app_dirs::AppDirs;

/// Key the final WPM of a session is stored under
pub const LAST_SCORE_KEY: &str = "wpm";

pub type StoreResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Single-slot-per-key string store, in the spirit of browser local storage
pub trait ScoreStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// Last persisted WPM. Missing or unreadable values count as 0.
pub fn last_score(store: &dyn ScoreStore) -> u64 {
    match store.get_item(LAST_SCORE_KEY) {
        Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed last score {value:?}");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Could not read last score: {e}");
            0
        }
    }
}

pub fn save_score(store: &mut dyn ScoreStore, wpm: u64) -> StoreResult<()> {
    store.set_item(LAST_SCORE_KEY, &wpm.to_string())
}

/// SQLite-backed store living in the user's state directory
#[derive(Debug)]
pub struct SqliteScoreStore {
    conn: Connection,
}

impl SqliteScoreStore {
    /// Open the store at the default location
    pub fn new() -> rusqlite::Result<Self> {
        match AppDirs::db_path() {
            Some(path) => Self::open(path),
            None => Self::open("chaabi_scores.db"),
        }
    }

    /// Open (and create if needed) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                        Some(format!("Failed to create directory: {}", e)),
                    )
                })?;
            }
        }

        log::debug!("Opening score store at {}", path.display());
        let store = Self::init(Connection::open(path)?)?;
        if let Some(saved_at) = store.updated_at(LAST_SCORE_KEY)? {
            log::debug!("Last score saved at {saved_at}");
        }
        Ok(store)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(SqliteScoreStore { conn })
    }

    /// When `key` was last written, as an RFC 3339 timestamp
    pub fn updated_at(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }
}

impl ScoreStore for SqliteScoreStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// Store that forgets everything when the process exits
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    items: HashMap<String, String>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
