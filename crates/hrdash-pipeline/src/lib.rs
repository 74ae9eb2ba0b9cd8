//! hrdash pipeline - Candidate metadata caching and scoring orchestration
//!
//! This crate connects the text extractor and the resume analyzer to
//! persistent state:
//! - Cache stores (memory, JSON file, PostgreSQL) behind `CacheStore`
//! - `MetadataCache`: extract, classify and tag each resume once
//! - Candidate sources (CSV export, PostgreSQL) behind `CandidateSource`
//! - `JobStore`: editable job descriptions
//! - `RecruitingPipeline`: candidates with metadata and relevance scores

pub mod cache;
pub mod jobs;
pub mod pipeline;
pub mod postgres;
pub mod source;
pub mod store;

#[cfg(test)]
mod testing;

pub use cache::{CacheStats, CacheStatsReport, MetadataCache};
pub use jobs::JobStore;
pub use pipeline::{AnalysisResult, RecruitingPipeline, ResumeDownload};
pub use postgres::{PgCacheStore, PgCandidateSource};
pub use source::{local_filename_from_url, parse_submissions, CsvCandidateSource};
pub use store::{JsonFileStore, MemoryStore};
