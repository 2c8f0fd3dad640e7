//! SQLite-backed session store (feature `sqlite`).
//!
//! One row per session: `sessions(id TEXT PRIMARY KEY, body BLOB, updated_at INTEGER)`.
//! The body is the JSON-serialized [`Session`].

use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use super::{JsonSerializer, Serializer, SessionStore, StoreError};
use crate::state::Session;

/// Session store persisted in a SQLite file.
///
/// The connection is wrapped in a `Mutex`; statements are short single-row reads and
/// upserts.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
    serializer: JsonSerializer,
}

impl SqliteSessionStore {
    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Storage(format!("failed to open database: {}", e)))?;
        info!(path = %path.display(), "session database opened");
        Self::init(conn)
    }

    /// In-memory database, for tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("failed to open in-memory db: {}", e)))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                body BLOB NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )
        .map_err(|e| StoreError::Storage(format!("failed to create table: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
            serializer: JsonSerializer,
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let body: Option<Vec<u8>> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT body FROM sessions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Storage(e.to_string()))
        })?;
        body.map(|b| self.serializer.deserialize(&b)).transpose()
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let body = self.serializer.serialize(session)?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, body, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                params![session.id, body, now],
            )
            .map(|_| ())
            .map_err(|e| StoreError::Storage(e.to_string()))
        })
    }
}
