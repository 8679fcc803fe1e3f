//! Persistence layer
//!
//! Ratings are stored as one JSON blob per namespace in a key-value table.
//! The SQLite backend is used by the viewer; the memory backend serves tests
//! and throwaway sessions.

mod database;
mod error;
mod kv;
mod rating_store;

pub use database::Database;
pub use error::StoreError;
pub use kv::{KeyValueBackend, MemoryBackend, SqliteBackend};
pub use rating_store::RatingStateStore;
