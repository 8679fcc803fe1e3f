//! Key-value backends
//!
//! A backend stores opaque string values under string keys. The rating store
//! keeps one serialized JSON blob per namespace and rewrites it whole on every
//! change, so backends never see partial records.

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};

use super::database::Database;
use super::error::StoreError;

pub trait KeyValueBackend: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// `kv_store` table in the local SQLite database
pub struct SqliteBackend {
    db: Database,
}

impl SqliteBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .conn()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.db.conn().execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = strftime('%s', 'now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.db
            .conn()
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

/// Process-local map, optionally capped at a byte quota
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse writes that would push the total stored bytes past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_bytes_excluding(key));
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_upsert_replaces_value() {
        let mut backend = SqliteBackend::new(Database::in_memory().unwrap());

        backend.set("pageFeedback", "{\"1\":1}").unwrap();
        backend.set("pageFeedback", "{\"1\":2}").unwrap();

        assert_eq!(
            backend.get("pageFeedback").unwrap().as_deref(),
            Some("{\"1\":2}")
        );
    }

    #[test]
    fn test_sqlite_remove_missing_key_is_ok() {
        let mut backend = SqliteBackend::new(Database::in_memory().unwrap());
        backend.remove("nothing").unwrap();
        assert!(backend.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_memory_quota_rejects_large_write() {
        let mut backend = MemoryBackend::with_quota(16);
        backend.set("a", "small").unwrap();

        let err = backend.set("b", "this value does not fit").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert!(backend.get("b").unwrap().is_none());
    }

    #[test]
    fn test_memory_quota_counts_replaced_value_once() {
        let mut backend = MemoryBackend::with_quota(12);
        backend.set("k", "0123456789").unwrap();
        backend.set("k", "9876543210").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("9876543210"));
    }
}
