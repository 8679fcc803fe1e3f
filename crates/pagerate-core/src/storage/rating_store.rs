//! Namespaced JSON blobs on top of a key-value backend
//!
//! Map namespaces hold a JSON object keyed by page id; log namespaces hold a
//! JSON array in insertion order. Every mutation reads the blob, changes it
//! and writes the whole blob back.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::database::Database;
use super::error::StoreError;
use super::kv::{KeyValueBackend, MemoryBackend, SqliteBackend};
use crate::diagnostics::{Diagnostic, DiagnosticSender};

pub struct RatingStateStore {
    backend: Box<dyn KeyValueBackend>,
    /// Session copies of namespaces whose writes failed. `None` means cleared.
    overlay: HashMap<String, Option<String>>,
    diagnostics: Option<DiagnosticSender>,
}

impl RatingStateStore {
    pub fn new(backend: Box<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            overlay: HashMap::new(),
            diagnostics: None,
        }
    }

    /// Store backed by the SQLite database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::new(path)?;
        Ok(Self::new(Box::new(SqliteBackend::new(db))))
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    pub fn with_diagnostics(mut self, sender: DiagnosticSender) -> Self {
        self.diagnostics = Some(sender);
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Whether `namespace` is being held in memory after a failed write
    pub fn is_degraded(&self, namespace: &str) -> bool {
        self.overlay.contains_key(namespace)
    }

    /// Upsert `record` under `key`, replacing any earlier record for that key
    pub fn put<T: Serialize>(
        &mut self,
        namespace: &str,
        key: &str,
        record: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        self.update_map(namespace, |map| {
            map.insert(key.to_string(), value);
            true
        })
    }

    pub fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        let value = self.read_map(namespace).remove(key)?;
        self.decode(namespace, key, value)
    }

    /// Every record in a map namespace; empty when the namespace is missing
    pub fn get_all<T: DeserializeOwned>(&self, namespace: &str) -> BTreeMap<String, T> {
        self.read_map(namespace)
            .into_iter()
            .filter_map(|(key, value)| {
                let record = self.decode(namespace, &key, value)?;
                Some((key, record))
            })
            .collect()
    }

    pub fn count(&self, namespace: &str) -> usize {
        self.read_map(namespace).len()
    }

    /// Remove one record, or the whole namespace when `key` is `None`
    pub fn clear(&mut self, namespace: &str, key: Option<&str>) -> Result<(), StoreError> {
        match key {
            Some(key) => self.update_map(namespace, |map| map.remove(key).is_some()),
            None => self.write_blob(namespace, None),
        }
    }

    /// Append to a log namespace
    pub fn append<T: Serialize>(&mut self, namespace: &str, record: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        let (mut entries, read_error) = match self.load_log(namespace) {
            Ok(entries) => (entries, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        entries.push(value);
        let blob = Some(serde_json::to_string(&entries)?);
        self.commit(namespace, blob, read_error)
    }

    /// Entries of a log namespace in append order
    pub fn log<T: DeserializeOwned>(&self, namespace: &str) -> Vec<T> {
        self.read_log(namespace)
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| self.decode(namespace, &i.to_string(), value))
            .collect()
    }

    /// Read-modify-write of a map namespace. `change` returns false when it
    /// left the map untouched.
    fn update_map(
        &mut self,
        namespace: &str,
        change: impl FnOnce(&mut BTreeMap<String, Value>) -> bool,
    ) -> Result<(), StoreError> {
        let (mut map, read_error) = match self.load_map(namespace) {
            Ok(map) => (map, None),
            Err(e) => (BTreeMap::new(), Some(e)),
        };
        if !change(&mut map) {
            return read_error.map_or(Ok(()), Err);
        }
        let blob = Some(serde_json::to_string(&map)?);
        self.commit(namespace, blob, read_error)
    }

    /// Write a rebuilt blob. After a failed read the blob only reflects this
    /// change, so it goes to the session overlay and the backend keeps what
    /// it has.
    fn commit(
        &mut self,
        namespace: &str,
        blob: Option<String>,
        read_error: Option<StoreError>,
    ) -> Result<(), StoreError> {
        match read_error {
            None => self.write_blob(namespace, blob),
            Some(e) => {
                warn!(
                    "Keeping '{}' in memory; {} could not be read first",
                    namespace,
                    self.backend.name()
                );
                self.overlay.insert(namespace.to_string(), blob);
                Err(e)
            }
        }
    }

    /// Blob for `namespace`, session overlay first
    fn load_blob(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        if let Some(value) = self.overlay.get(namespace) {
            return Ok(value.clone());
        }
        self.backend.get(namespace).inspect_err(|e| {
            warn!("Failed to read '{}' from {}: {}", namespace, self.backend.name(), e);
            self.emit(Diagnostic::ReadFailed {
                namespace: namespace.to_string(),
                error: e.to_string(),
            });
        })
    }

    fn write_blob(&mut self, namespace: &str, blob: Option<String>) -> Result<(), StoreError> {
        if self.overlay.contains_key(namespace) {
            self.overlay.insert(namespace.to_string(), blob);
            return Err(StoreError::Degraded(namespace.to_string()));
        }

        let result = match &blob {
            Some(value) => self.backend.set(namespace, value),
            None => self.backend.remove(namespace),
        };

        match result {
            Ok(()) => {
                debug!("Wrote '{}' to {}", namespace, self.backend.name());
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Write of '{}' to {} failed, keeping it in memory: {}",
                    namespace,
                    self.backend.name(),
                    e
                );
                self.overlay.insert(namespace.to_string(), blob);
                self.emit(Diagnostic::WriteFailed {
                    namespace: namespace.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Parsed map namespace. Malformed data reads as empty; a failed read is
    /// an error.
    fn load_map(&self, namespace: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        let Some(blob) = self.load_blob(namespace)? else {
            return Ok(BTreeMap::new());
        };
        Ok(serde_json::from_str(&blob).unwrap_or_else(|e| {
            self.malformed(namespace, &e.to_string());
            BTreeMap::new()
        }))
    }

    fn load_log(&self, namespace: &str) -> Result<Vec<Value>, StoreError> {
        let Some(blob) = self.load_blob(namespace)? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&blob).unwrap_or_else(|e| {
            self.malformed(namespace, &e.to_string());
            Vec::new()
        }))
    }

    /// Query view of a map namespace; empty on any failure
    fn read_map(&self, namespace: &str) -> BTreeMap<String, Value> {
        self.load_map(namespace).unwrap_or_default()
    }

    fn read_log(&self, namespace: &str) -> Vec<Value> {
        self.load_log(namespace).unwrap_or_default()
    }

    fn decode<T: DeserializeOwned>(&self, namespace: &str, key: &str, value: Value) -> Option<T> {
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                self.malformed(namespace, &format!("entry '{}': {}", key, e));
                None
            }
        }
    }

    fn malformed(&self, namespace: &str, error: &str) {
        warn!("Treating malformed '{}' data as empty: {}", namespace, error);
        self.emit(Diagnostic::MalformedBlob {
            namespace: namespace.to_string(),
            error: error.to_string(),
        });
    }

    fn emit(&self, diagnostic: Diagnostic) {
        if let Some(tx) = &self.diagnostics {
            let _ = tx.send(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics;
    use crate::rating::{Rating, RatingRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const NS: &str = "pageFeedback";
    const LOG: &str = "integratedFeedback";

    #[test]
    fn test_put_twice_keeps_one_record() {
        let mut store = RatingStateStore::in_memory();

        store
            .put(NS, "3", &RatingRecord::new("3", Rating::Up))
            .unwrap();
        store
            .put(
                NS,
                "3",
                &RatingRecord::new("3", Rating::Down).with_comment("too long"),
            )
            .unwrap();

        let all: BTreeMap<String, RatingRecord> = store.get_all(NS);
        assert_eq!(all.len(), 1);
        assert_eq!(all["3"].rating, Rating::Down);
        assert_eq!(all["3"].comment, "too long");
    }

    #[test]
    fn test_get_all_missing_namespace_is_empty() {
        let store = RatingStateStore::in_memory();
        let all: BTreeMap<String, RatingRecord> = store.get_all(NS);
        assert!(all.is_empty());
        assert_eq!(store.count(NS), 0);
    }

    #[test]
    fn test_clear_single_key_and_namespace() {
        let mut store = RatingStateStore::in_memory();
        store.put(NS, "1", &RatingRecord::new("1", Rating::Up)).unwrap();
        store.put(NS, "2", &RatingRecord::new("2", Rating::Down)).unwrap();

        store.clear(NS, Some("1")).unwrap();
        assert_eq!(store.count(NS), 1);
        assert!(store.get::<RatingRecord>(NS, "1").is_none());

        store.clear(NS, None).unwrap();
        assert_eq!(store.count(NS), 0);
    }

    #[test]
    fn test_log_preserves_append_order() {
        let mut store = RatingStateStore::in_memory();
        for page in ["a", "b", "c"] {
            store
                .append("integratedFeedback", &RatingRecord::new(page, Rating::Up))
                .unwrap();
        }

        let log: Vec<RatingRecord> = store.log("integratedFeedback");
        let ids: Vec<_> = log.iter().map(|r| r.page_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_malformed_blob_reads_as_empty() {
        let mut backend = MemoryBackend::new();
        backend.set(NS, "{not json").unwrap();
        let (tx, mut rx) = diagnostics::channel();
        let store = RatingStateStore::new(Box::new(backend)).with_diagnostics(tx);

        let all: BTreeMap<String, RatingRecord> = store.get_all(NS);
        assert!(all.is_empty());
        assert!(matches!(
            rx.try_recv().unwrap(),
            Diagnostic::MalformedBlob { .. }
        ));
    }

    #[test]
    fn test_put_over_malformed_blob_replaces_it() {
        let mut backend = MemoryBackend::new();
        backend.set(NS, "[1, 2").unwrap();
        let mut store = RatingStateStore::new(Box::new(backend));

        store.put(NS, "1", &RatingRecord::new("1", Rating::Up)).unwrap();
        assert_eq!(store.count(NS), 1);
    }

    #[test]
    fn test_failed_write_falls_back_to_session_overlay() {
        let (tx, mut rx) = diagnostics::channel();
        let mut store =
            RatingStateStore::new(Box::new(MemoryBackend::with_quota(8))).with_diagnostics(tx);

        let result = store.put(NS, "1", &RatingRecord::new("1", Rating::Up));
        assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
        assert!(store.is_degraded(NS));
        assert!(matches!(
            rx.try_recv().unwrap(),
            Diagnostic::WriteFailed { .. }
        ));

        // Reads see the session copy
        let record: RatingRecord = store.get(NS, "1").unwrap();
        assert_eq!(record.rating, Rating::Up);

        // Later writes stay in memory
        let result = store.put(NS, "2", &RatingRecord::new("2", Rating::Down));
        assert!(matches!(result, Err(StoreError::Degraded(_))));
        assert_eq!(store.count(NS), 2);
    }

    #[test]
    fn test_sqlite_store_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ratings.db");

        {
            let mut store = RatingStateStore::open(&path).unwrap();
            store
                .put(
                    NS,
                    "3",
                    &RatingRecord::new("3", Rating::Up)
                        .with_qualities(["Clear insights"]),
                )
                .unwrap();
        }

        let store = RatingStateStore::open(&path).unwrap();
        assert_eq!(store.backend_name(), "sqlite");
        let record: RatingRecord = store.get(NS, "3").unwrap();
        assert_eq!(record.qualities, vec!["Clear insights"]);
    }

    #[test]
    fn test_sqlite_round_trip_keeps_every_field() {
        let temp = TempDir::new().unwrap();
        let mut store = RatingStateStore::open(&temp.path().join("ratings.db")).unwrap();

        let up = RatingRecord::new("3", Rating::Up)
            .with_qualities(["Clear insights", "Well organized"])
            .with_comment("great chart");
        let down = RatingRecord::new("4", Rating::Down).with_comment("too dense");
        store.put(NS, "3", &up).unwrap();
        store.put(NS, "4", &down).unwrap();

        let all: BTreeMap<String, RatingRecord> = store.get_all(NS);
        assert_eq!(all.len(), 2);
        assert_eq!(all["3"], up);
        assert_eq!(all["4"], down);
    }

    /// Memory backend that fails reads while `failing_reads` is above zero
    struct FlakyBackend {
        inner: MemoryBackend,
        failing_reads: Arc<AtomicUsize>,
    }

    impl KeyValueBackend for FlakyBackend {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let remaining = self.failing_reads.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failing_reads.store(remaining - 1, Ordering::SeqCst);
                return Err(StoreError::Database(rusqlite::Error::InvalidQuery));
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    #[test]
    fn test_failed_read_leaves_stored_records_alone() {
        let failing_reads = Arc::new(AtomicUsize::new(0));
        let backend = FlakyBackend {
            inner: MemoryBackend::new(),
            failing_reads: failing_reads.clone(),
        };
        let (tx, mut rx) = diagnostics::channel();
        let mut store = RatingStateStore::new(Box::new(backend)).with_diagnostics(tx);

        store.put(NS, "1", &RatingRecord::new("1", Rating::Up)).unwrap();
        store.put(NS, "2", &RatingRecord::new("2", Rating::Down)).unwrap();

        failing_reads.store(1, Ordering::SeqCst);
        let result = store.put(NS, "3", &RatingRecord::new("3", Rating::Up));
        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(store.is_degraded(NS));
        assert!(matches!(
            rx.try_recv().unwrap(),
            Diagnostic::ReadFailed { .. }
        ));

        // The backend still holds both earlier records
        let blob = store.backend.get(NS).unwrap().unwrap();
        let persisted: BTreeMap<String, RatingRecord> = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(persisted.contains_key("1"));
        assert!(persisted.contains_key("2"));

        // The new record is kept for the session
        let record: RatingRecord = store.get(NS, "3").unwrap();
        assert_eq!(record.rating, Rating::Up);
    }

    #[test]
    fn test_failed_read_before_clear_and_append_keeps_backend() {
        let failing_reads = Arc::new(AtomicUsize::new(0));
        let backend = FlakyBackend {
            inner: MemoryBackend::new(),
            failing_reads: failing_reads.clone(),
        };
        let mut store = RatingStateStore::new(Box::new(backend));

        store.put(NS, "1", &RatingRecord::new("1", Rating::Up)).unwrap();
        store.append(LOG, &RatingRecord::new("1", Rating::Up)).unwrap();

        failing_reads.store(1, Ordering::SeqCst);
        assert!(store.clear(NS, Some("1")).is_err());
        let blob = store.backend.get(NS).unwrap().unwrap();
        assert!(blob.contains("\"1\""));

        failing_reads.store(1, Ordering::SeqCst);
        assert!(store.append(LOG, &RatingRecord::new("2", Rating::Down)).is_err());
        let blob = store.backend.get(LOG).unwrap().unwrap();
        let entries: Vec<Value> = serde_json::from_str(&blob).unwrap();
        assert_eq!(entries.len(), 1);
    }
}
