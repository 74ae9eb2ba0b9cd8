//! hrdash core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the recruiting
//! dashboard:
//! - Candidate and job description models
//! - Cached candidate metadata (role, tags, extracted text)
//! - Common error types
//! - Storage and source traits (candidate sources, cache stores, fetchers)
//! - Configuration management and logging setup

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, ClassifierConfig, ConfigError, DatabaseConfig, FetchConfig, LoggingConfig,
    ServerConfig, StorageConfig,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for dashboard operations
#[derive(Error, Debug)]
pub enum HrError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HrError>;

// ============================================================================
// Identifiers and Labels
// ============================================================================

/// Stable candidate identifier (CSV row index or database id)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CandidateId(pub i64);

impl CandidateId {
    /// Key used by cache stores
    pub fn cache_key(&self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CandidateId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Role assigned to a candidate by the classifier
///
/// Either one of the classification dictionary's role labels or the
/// `Unclassified` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleLabel(String);

impl RoleLabel {
    /// Label used when no role keyword matched
    pub const UNCLASSIFIED: &'static str = "Unclassified";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn unclassified() -> Self {
        Self(Self::UNCLASSIFIED.to_string())
    }

    pub fn is_unclassified(&self) -> bool {
        self.0 == Self::UNCLASSIFIED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoleLabel {
    fn default() -> Self {
        Self::unclassified()
    }
}

impl std::fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for RoleLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RoleLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// Extraction Results
// ============================================================================

/// Dictionary tags found in a resume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTags {
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub languages: Vec<String>,
}

impl EntityTags {
    /// True when no tag of any kind was found
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.locations.is_empty() && self.languages.is_empty()
    }
}

/// Memoized extraction result for one candidate
///
/// An entry without `text` is the sentinel written when extraction produced
/// nothing; it is retried on the next lookup. An entry with `text` is final
/// until the entry is removed from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    pub role: RoleLabel,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CandidateMetadata {
    /// Sentinel entry for a candidate whose document yielded no text
    pub fn unextracted() -> Self {
        Self::default()
    }

    /// Entry for successfully extracted text
    pub fn extracted(text: impl Into<String>, role: RoleLabel, tags: EntityTags) -> Self {
        Self {
            role,
            skills: tags.skills,
            locations: tags.locations,
            languages: tags.languages,
            text: Some(text.into()),
        }
    }

    /// Whether this entry holds extracted text (and is therefore final)
    pub fn is_extracted(&self) -> bool {
        self.text.is_some()
    }

    /// Extracted text, or an empty string for sentinel entries
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Relevance of a resume to a job description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Percentage of important job keywords found in the resume (0-100, one decimal)
    pub score: f64,
    /// The important keywords that matched
    pub matched_keywords: Vec<String>,
}

impl ScoreResult {
    pub fn zero() -> Self {
        Self::default()
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// Raw candidate row as yielded by a candidate source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    #[serde(default)]
    pub submission_time: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub working_status: String,
    /// Remote resume location (may be empty)
    #[serde(default)]
    pub resume_url: String,
    /// Resume file name inside the data directory (may be empty)
    #[serde(default)]
    pub local_filename: String,
}

/// Candidate with derived metadata attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub submission_time: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub working_status: String,
    pub resume_url: String,
    pub local_filename: String,
    pub role: RoleLabel,
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub languages: Vec<String>,
    pub resume_text: String,
}

impl Candidate {
    /// Attach metadata to a raw record
    ///
    /// Role and tags always come from the metadata entry, never from the
    /// source row.
    pub fn from_record(record: CandidateRecord, metadata: CandidateMetadata) -> Self {
        Self {
            id: record.id,
            submission_time: record.submission_time,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            working_status: record.working_status,
            resume_url: record.resume_url,
            local_filename: record.local_filename,
            role: metadata.role,
            skills: metadata.skills,
            locations: metadata.locations,
            languages: metadata.languages,
            resume_text: metadata.text.unwrap_or_default(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// ============================================================================
// Jobs, Status and Feedback
// ============================================================================

/// Open position used as scoring input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl JobDescription {
    pub fn new(id: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            skills: Vec::new(),
            location: None,
        }
    }
}

/// Status assigned to candidates nobody has touched yet
pub const DEFAULT_STATUS: &str = "Received";

/// Interview feedback recorded for a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: i32,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Traits
// ============================================================================

/// Source of raw candidate rows (CSV export, hosted database)
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Load every candidate row
    async fn load(&self) -> Result<Vec<CandidateRecord>>;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Key-value storage for candidate metadata entries
///
/// `put` only updates the store's working set; `persist` makes it durable.
/// Backends that write through may treat `persist` as a no-op.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an entry
    async fn get(&self, key: &str) -> Result<Option<CandidateMetadata>>;

    /// Insert or replace an entry
    async fn put(&self, key: &str, entry: CandidateMetadata) -> Result<()>;

    /// Remove an entry, returning whether it existed
    async fn remove(&self, key: &str) -> Result<bool>;

    /// Flush pending writes to durable storage
    async fn persist(&self) -> Result<()>;

    /// Get store name for logging
    fn name(&self) -> &str;
}

/// Fetches remote documents into memory
#[async_trait::async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

// ============================================================================
// Tests
// ============================================================================
