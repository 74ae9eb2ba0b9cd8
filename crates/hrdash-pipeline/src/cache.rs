//! Metadata cache
//!
//! Memoizes text extraction, role classification and entity tagging per
//! candidate. An entry carrying extracted text is final and returned as-is.
//! An entry without text (the sentinel written when extraction produced
//! nothing) is retried on every lookup until extraction succeeds.
//!
//! Lookups for the same candidate are not serialized: concurrent misses may
//! both extract, and the last write wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hrdash_core::{CacheStore, CandidateId, CandidateMetadata};
use hrdash_extractor::ResumeAnalyzer;
use hrdash_parser::{DocumentReference, TextExtractor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// ============================================================================
// Metadata Cache
// ============================================================================

/// Extraction results per candidate, backed by a `CacheStore`
pub struct MetadataCache {
    store: Arc<dyn CacheStore>,
    extractor: Arc<TextExtractor>,
    analyzer: Arc<ResumeAnalyzer>,
    stats: Arc<CacheStats>,
}

impl MetadataCache {
    pub fn new(
        store: Arc<dyn CacheStore>,
        extractor: Arc<TextExtractor>,
        analyzer: Arc<ResumeAnalyzer>,
    ) -> Self {
        let stats = Arc::new(CacheStats::new(store.name()));
        Self {
            store,
            extractor,
            analyzer,
            stats,
        }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Text extractor used on misses
    pub fn extractor(&self) -> &Arc<TextExtractor> {
        &self.extractor
    }

    /// Classifier and tagger used on misses
    pub fn analyzer(&self) -> &Arc<ResumeAnalyzer> {
        &self.analyzer
    }

    /// Get cache statistics
    pub fn stats(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }

    /// Cached metadata for a candidate, computing it when needed
    ///
    /// Without a document reference the candidate gets the sentinel entry.
    pub async fn get_or_compute(
        &self,
        candidate_id: &CandidateId,
        reference: Option<&DocumentReference>,
    ) -> CandidateMetadata {
        let (entry, changed) = self.lookup_or_compute(candidate_id, reference).await;
        if changed {
            self.persist().await;
        }
        entry
    }

    /// Batch lookup, in order, persisting once at the end
    pub async fn get_or_compute_many(
        &self,
        items: &[(CandidateId, Option<DocumentReference>)],
    ) -> Vec<CandidateMetadata> {
        let mut entries = Vec::with_capacity(items.len());
        let mut changed = false;

        for (candidate_id, reference) in items {
            let (entry, written) = self.lookup_or_compute(candidate_id, reference.as_ref()).await;
            changed |= written;
            entries.push(entry);
        }

        if changed {
            self.persist().await;
        }

        info!(
            candidates = items.len(),
            hits = self.stats.hits(),
            misses = self.stats.misses(),
            "Metadata cache batch complete"
        );
        entries
    }

    /// Drop a candidate's entry so the next lookup extracts again
    pub async fn invalidate(&self, candidate_id: &CandidateId) -> hrdash_core::Result<bool> {
        let removed = self.store.remove(&candidate_id.cache_key()).await?;
        if removed {
            self.stats.record_invalidation();
            self.store.persist().await?;
        }
        Ok(removed)
    }

    /// Returns the entry and whether the store was modified
    async fn lookup_or_compute(
        &self,
        candidate_id: &CandidateId,
        reference: Option<&DocumentReference>,
    ) -> (CandidateMetadata, bool) {
        let key = candidate_id.cache_key();

        let existing = match self.store.get(&key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(candidate_id = %candidate_id, error = %e, "Cache read failed");
                None
            }
        };

        if let Some(entry) = existing.as_ref().filter(|e| e.is_extracted()) {
            self.stats.record_hit();
            return (entry.clone(), false);
        }

        self.stats.record_miss();
        debug!(candidate_id = %candidate_id, "Metadata cache miss");

        let text = match reference {
            Some(reference) => self.extractor.extract_text(reference).await,
            None => String::new(),
        };

        if !text.is_empty() {
            let (role, tags) = self.analyzer.analyze(&text);
            let entry = CandidateMetadata::extracted(text, role, tags);
            let written = self.write(candidate_id, &key, entry.clone()).await;
            return (entry, written);
        }

        match existing {
            Some(sentinel) => (sentinel, false),
            None => {
                let sentinel = CandidateMetadata::unextracted();
                let written = self.write(candidate_id, &key, sentinel.clone()).await;
                (sentinel, written)
            }
        }
    }

    async fn write(&self, candidate_id: &CandidateId, key: &str, entry: CandidateMetadata) -> bool {
        match self.store.put(key, entry).await {
            Ok(()) => {
                self.stats.record_write();
                true
            }
            Err(e) => {
                warn!(candidate_id = %candidate_id, error = %e, "Cache write failed");
                false
            }
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.store.persist().await {
            warn!(store = self.store.name(), error = %e, "Failed to persist metadata cache");
        }
    }
}

// ============================================================================
// Cache Statistics
// ============================================================================

/// Statistics for cache performance monitoring
#[derive(Debug)]
pub struct CacheStats {
    /// Store name for identification
    name: String,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheStats {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn invalidations(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    /// Get total requests (hits + misses)
    pub fn total_requests(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Calculate hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Get a summary report
    pub fn report(&self) -> CacheStatsReport {
        CacheStatsReport {
            name: self.name.clone(),
            hits: self.hits(),
            misses: self.misses(),
            writes: self.writes(),
            invalidations: self.invalidations(),
            total_requests: self.total_requests(),
            hit_rate: self.hit_rate(),
        }
    }
}

/// Serializable cache statistics report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatsReport {
    pub name: String,
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub invalidations: u64,
    pub total_requests: u64,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use crate::testing::{analyzer, CountingFetcher, FailingStore};
    use hrdash_core::RoleLabel;

    fn cache_with(store: Arc<dyn CacheStore>, fetcher: Arc<CountingFetcher>) -> MetadataCache {
        let extractor = TextExtractor::new(fetcher, Vec::new());
        MetadataCache::new(store, Arc::new(extractor), analyzer())
    }

    fn remote(url: &str) -> DocumentReference {
        DocumentReference::parse(url).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_once_then_hits() {
        let fetcher = CountingFetcher::serving("Senior architect, 8+ years, Python and AWS");
        let cache = cache_with(Arc::new(MemoryStore::new()), fetcher.clone());
        let id = CandidateId(1);
        let reference = remote("https://files.test/cv.txt");

        let first = cache.get_or_compute(&id, Some(&reference)).await;
        let second = cache.get_or_compute(&id, Some(&reference)).await;

        assert_eq!(first, second);
        assert_eq!(first.role, "Senior Software Engineer");
        assert_eq!(first.skills, vec!["Python", "AWS"]);
        assert_eq!(fetcher.calls(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.writes(), 1);
    }

    #[tokio::test]
    async fn test_empty_extraction_stores_sentinel_and_retries() {
        let fetcher = CountingFetcher::failing();
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone(), fetcher.clone());
        let id = CandidateId(2);
        let reference = remote("https://files.test/missing.pdf");

        let entry = cache.get_or_compute(&id, Some(&reference)).await;
        assert_eq!(entry, CandidateMetadata::unextracted());
        assert_eq!(store.get("2").await.unwrap(), Some(CandidateMetadata::unextracted()));

        // Sentinel is not final: the next lookup extracts again
        cache.get_or_compute(&id, Some(&reference)).await;
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(cache.stats().writes(), 1);
    }

    #[tokio::test]
    async fn test_sentinel_is_replaced_once_text_appears() {
        let store = Arc::new(MemoryStore::new());
        store.put("3", CandidateMetadata::unextracted()).await.unwrap();

        let cache = cache_with(store.clone(), CountingFetcher::serving("Figma wireframes"));
        let entry = cache
            .get_or_compute(&CandidateId(3), Some(&remote("https://files.test/cv.txt")))
            .await;

        assert!(entry.is_extracted());
        assert_eq!(entry.role, "UX Designer Intern");
        assert_eq!(store.get("3").await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_existing_entry_without_text_is_kept_on_failure() {
        let store = Arc::new(MemoryStore::new());
        let legacy = CandidateMetadata {
            role: RoleLabel::new("Product Designer"),
            ..Default::default()
        };
        store.put("4", legacy.clone()).await.unwrap();

        let cache = cache_with(store.clone(), CountingFetcher::failing());
        let entry = cache
            .get_or_compute(&CandidateId(4), Some(&remote("https://files.test/cv.pdf")))
            .await;

        assert_eq!(entry, legacy);
        assert_eq!(cache.stats().writes(), 0);
    }

    #[tokio::test]
    async fn test_no_reference_gives_sentinel() {
        let fetcher = CountingFetcher::serving("unused");
        let cache = cache_with(Arc::new(MemoryStore::new()), fetcher.clone());

        let entry = cache.get_or_compute(&CandidateId(5), None).await;
        assert!(entry.role.is_unclassified());
        assert!(!entry.is_extracted());
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failures_are_not_fatal() {
        let cache = cache_with(Arc::new(FailingStore), CountingFetcher::serving("Python developer"));
        let entry = cache
            .get_or_compute(&CandidateId(6), Some(&remote("https://files.test/cv.txt")))
            .await;

        assert!(entry.is_extracted());
        assert_eq!(entry.skills, vec!["Python"]);
    }

    #[tokio::test]
    async fn test_batch_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata_cache.json");
        let store: Arc<JsonFileStore<CandidateMetadata>> = Arc::new(JsonFileStore::open(&path).await);
        let cache = cache_with(store, CountingFetcher::serving("Riyadh, KSA summer internship"));

        let items = vec![
            (CandidateId(0), Some(remote("https://files.test/a.txt"))),
            (CandidateId(1), None),
        ];
        let entries = cache.get_or_compute_many(&items).await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, "Software Engineer Internship (Riyadh)");
        assert!(!entries[1].is_extracted());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["0"]["text"].is_string());
        assert!(raw["1"].get("text").is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let fetcher = CountingFetcher::serving("Python");
        let cache = cache_with(Arc::new(MemoryStore::new()), fetcher.clone());
        let id = CandidateId(7);
        let reference = remote("https://files.test/cv.txt");

        cache.get_or_compute(&id, Some(&reference)).await;
        assert!(cache.invalidate(&id).await.unwrap());
        assert!(!cache.invalidate(&id).await.unwrap());

        cache.get_or_compute(&id, Some(&reference)).await;
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(cache.stats().report().invalidations, 1);
    }
}
