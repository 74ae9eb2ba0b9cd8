//! Shared test doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hrdash_core::{CacheStore, CandidateMetadata, DocumentFetcher, HrError, Result};
use hrdash_extractor::ResumeAnalyzer;

pub(crate) fn analyzer() -> Arc<ResumeAnalyzer> {
    Arc::new(ResumeAnalyzer::default())
}

/// Fetcher serving a fixed body, or failing when none is set
pub(crate) struct CountingFetcher {
    body: Option<Vec<u8>>,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub(crate) fn serving(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body.as_bytes().to_vec()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body
            .clone()
            .ok_or_else(|| HrError::FetchError(format!("{url} returned 404")))
    }
}

/// Store whose every operation fails
pub(crate) struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<CandidateMetadata>> {
        Err(HrError::StorageError("store offline".to_string()))
    }

    async fn put(&self, _key: &str, _entry: CandidateMetadata) -> Result<()> {
        Err(HrError::StorageError("store offline".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<bool> {
        Err(HrError::StorageError("store offline".to_string()))
    }

    async fn persist(&self) -> Result<()> {
        Err(HrError::StorageError("store offline".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
