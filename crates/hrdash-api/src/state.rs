//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use hrdash_core::{AppConfig, Feedback, Result};
use hrdash_pipeline::{JobStore, JsonFileStore, RecruitingPipeline};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Candidates, metadata cache and scoring
    pub pipeline: Arc<RecruitingPipeline>,
    /// Open positions
    pub jobs: JobStore,
    /// Pipeline status per candidate id
    pub statuses: JsonFileStore<String>,
    /// Interview feedback per candidate id
    pub feedback: JsonFileStore<Feedback>,
}

impl AppState {
    /// Build state, including the pipeline, from configuration
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let pipeline = RecruitingPipeline::from_config(&config).await?;
        Ok(Self::with_pipeline(config, Arc::new(pipeline)).await)
    }

    /// Build state around an existing pipeline
    pub async fn with_pipeline(config: AppConfig, pipeline: Arc<RecruitingPipeline>) -> Self {
        let storage = &config.storage;
        let jobs = JobStore::open(&storage.jobs_path).await;
        let statuses: JsonFileStore<String> = JsonFileStore::open(&storage.status_path).await;
        let feedback: JsonFileStore<Feedback> = JsonFileStore::open(&storage.feedback_path).await;

        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            pipeline,
            jobs,
            statuses,
            feedback,
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
