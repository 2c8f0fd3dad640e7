use async_trait::async_trait;
use thiserror::Error;

use crate::state::Session;

/// Error from a session store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage: {0}")]
    Storage(String),
    #[error("serialization: {0}")]
    Serialization(String),
}

/// Keyed session storage.
///
/// Implementations do not lock; callers serialize access per id with
/// [`SessionLocks`](super::SessionLocks).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, or `None` when the id was never saved.
    async fn load(&self, id: &str) -> Result<Option<Session>, StoreError>;

    /// Inserts or replaces the session under `session.id`.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;
}
