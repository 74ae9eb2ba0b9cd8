//! Key-value stores backed by memory or JSON files
//!
//! `JsonFileStore` keeps the whole map in memory behind a `RwLock` and
//! rewrites the file on `persist`. A missing file starts empty; an
//! unreadable or corrupt file also starts empty, with a warning, so a bad
//! state file never prevents start-up.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hrdash_core::{CacheStore, CandidateMetadata, HrError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

// ============================================================================
// JSON Helpers
// ============================================================================

/// Read a JSON file, falling back to `T::default()` when missing or corrupt
pub(crate) async fn load_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "State file missing, starting empty");
            return T::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read state file, starting empty");
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Corrupt state file, starting empty");
            T::default()
        }
    }
}

/// Write a value as pretty-printed JSON
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| HrError::StorageError(format!("Failed to serialize {}: {e}", path.display())))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            HrError::StorageError(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }

    tokio::fs::write(path, json)
        .await
        .map_err(|e| HrError::StorageError(format!("Failed to write {}: {e}", path.display())))
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory cache store, lost on exit
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CandidateMetadata>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CandidateMetadata>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, entry: CandidateMetadata) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn persist(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// JSON File Store
// ============================================================================

/// String-keyed map persisted as one JSON object
pub struct JsonFileStore<V> {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, V>>,
}

impl<V> JsonFileStore<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open a store, loading existing entries from `path`
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries: BTreeMap<String, V> = load_json_or_default(&path).await;
        debug!(path = %path.display(), entries = entries.len(), "Opened JSON store");

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Insert or replace an entry (in memory only)
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        self.entries.write().await.insert(key.into(), value);
    }

    /// Remove an entry (in memory only)
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Copy of all entries
    pub async fn snapshot(&self) -> BTreeMap<String, V> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Write all entries to the backing file
    pub async fn save(&self) -> Result<()> {
        let entries = self.entries.read().await;
        write_json(&self.path, &*entries).await
    }

    /// Insert an entry and write the file
    pub async fn insert_and_save(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.insert(key, value).await;
        self.save().await
    }
}

#[async_trait]
impl CacheStore for JsonFileStore<CandidateMetadata> {
    async fn get(&self, key: &str) -> Result<Option<CandidateMetadata>> {
        Ok(JsonFileStore::get(self, key).await)
    }

    async fn put(&self, key: &str, entry: CandidateMetadata) -> Result<()> {
        self.insert(key, entry).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.delete(key).await)
    }

    async fn persist(&self) -> Result<()> {
        self.save().await
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdash_core::{EntityTags, Feedback, RoleLabel};

    fn entry(text: &str) -> CandidateMetadata {
        CandidateMetadata::extracted(text, RoleLabel::new("Product Designer"), EntityTags::default())
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("1").await.unwrap().is_none());

        store.put("1", entry("resume")).await.unwrap();
        assert_eq!(store.get("1").await.unwrap(), Some(entry("resume")));
        assert_eq!(store.len().await, 1);

        assert!(store.remove("1").await.unwrap());
        assert!(!store.remove("1").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonFileStore<CandidateMetadata> =
            JsonFileStore::open(dir.path().join("metadata_cache.json")).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata_cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store: JsonFileStore<CandidateMetadata> = JsonFileStore::open(&path).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_persist_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("metadata_cache.json");

        let store: JsonFileStore<CandidateMetadata> = JsonFileStore::open(&path).await;
        store.put("0", entry("first")).await.unwrap();
        store.put("1", CandidateMetadata::unextracted()).await.unwrap();
        store.persist().await.unwrap();

        let reopened: JsonFileStore<CandidateMetadata> = JsonFileStore::open(&path).await;
        assert_eq!(reopened.len().await, 2);
        assert_eq!(CacheStore::get(&reopened, "0").await.unwrap(), Some(entry("first")));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["1"].get("text").is_none());
        assert_eq!(raw["0"]["text"], "first");
    }

    #[tokio::test]
    async fn test_put_does_not_write_until_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata_cache.json");

        let store: JsonFileStore<CandidateMetadata> = JsonFileStore::open(&path).await;
        store.put("0", entry("text")).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_generic_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interviews.json");
        std::fs::write(&path, r#"{"4": {"rating": 3, "notes": "solid"}}"#).unwrap();

        let store: JsonFileStore<Feedback> = JsonFileStore::open(&path).await;
        assert_eq!(store.get("4").await.unwrap().rating, 3);

        store
            .insert_and_save(
                "5",
                Feedback {
                    rating: 5,
                    notes: "hire".to_string(),
                    updated_at: None,
                },
            )
            .await
            .unwrap();

        let reopened: JsonFileStore<Feedback> = JsonFileStore::open(&path).await;
        assert_eq!(reopened.snapshot().await.len(), 2);
    }
}
