//! # Memory: Session persistence and per-session serialization
//!
//! ## Overview
//!
//! 1. **SessionStore**: keyed storage of [`Session`](crate::state::Session) records. The
//!    engine loads a session at turn start and saves it once at turn completion; nothing
//!    is written while a turn is in flight.
//! 2. **SessionLocks**: one async mutex per session id. A turn holds its session's lock
//!    from load to save, so two turns against the same id never interleave while turns
//!    for different ids run concurrently.
//!
//! ## Store Implementations
//!
//! | Type                   | Persistence | Use case                | Feature  |
//! |------------------------|-------------|-------------------------|----------|
//! | [`MemorySessionStore`] | In-memory   | Dev, tests              | —        |
//! | [`SqliteSessionStore`] | SQLite file | Single-node, restarts   | `sqlite` |
//!
//! [`JsonSerializer`] turns sessions into the bytes `SqliteSessionStore` keeps per row.

mod locks;
mod memory_store;
mod serializer;
#[cfg(feature = "sqlite")]
mod sqlite_store;
mod store;

pub use locks::{SessionGuard, SessionLocks};
pub use memory_store::MemorySessionStore;
pub use serializer::{JsonSerializer, Serializer};
#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteSessionStore;
pub use store::{SessionStore, StoreError};
