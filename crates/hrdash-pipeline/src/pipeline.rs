//! Recruiting pipeline
//!
//! Joins candidate rows with their cached metadata and scores resumes
//! against job descriptions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use hrdash_core::{
    AppConfig, CacheStore, Candidate, CandidateId, CandidateMetadata, CandidateRecord,
    CandidateSource, HrError, JobDescription, Result, ScoreResult,
};
use hrdash_extractor::{RelevanceScorer, ResumeAnalyzer};
use hrdash_parser::{DocumentReference, TextExtractor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::postgres::{self, PgCacheStore, PgCandidateSource};
use crate::{CsvCandidateSource, JsonFileStore, MetadataCache};

/// Score of one candidate against an ad-hoc job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: CandidateId,
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

/// Original resume file of a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeDownload {
    /// Contents fetched or read by the server
    File { filename: String, bytes: Vec<u8> },
    /// Hosted copy the server could not fetch; clients should follow the URL
    Redirect(String),
}

/// Candidate source, metadata cache and scorer wired together
pub struct RecruitingPipeline {
    source: Arc<dyn CandidateSource>,
    cache: Arc<MetadataCache>,
    scorer: RelevanceScorer,
    data_dir: PathBuf,
}

impl RecruitingPipeline {
    /// Assemble a pipeline
    ///
    /// `data_dir` is where local resume files are looked for when choosing
    /// what to extract.
    pub fn new(
        source: Arc<dyn CandidateSource>,
        cache: Arc<MetadataCache>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            cache,
            scorer: RelevanceScorer::new(),
            data_dir: data_dir.into(),
        }
    }

    /// Build from configuration
    ///
    /// Uses PostgreSQL when a URL is configured and reachable, otherwise the
    /// CSV export and the JSON cache file.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let analyzer = ResumeAnalyzer::from_config(&config.classifier)
            .map_err(|e| HrError::ConfigError(e.to_string()))?;
        let extractor = TextExtractor::from_config(&config.storage, &config.fetch)?;

        let (source, store) = match open_database(config).await {
            Some(backend) => backend,
            None => {
                let source: Arc<dyn CandidateSource> =
                    Arc::new(CsvCandidateSource::new(config.storage.candidates_csv_path()));
                let store: Arc<dyn CacheStore> =
                    Arc::new(JsonFileStore::<CandidateMetadata>::open(&config.storage.cache_path).await);
                (source, store)
            }
        };

        info!(
            source = source.name(),
            cache = store.name(),
            "Recruiting pipeline ready"
        );

        let cache = MetadataCache::new(store, Arc::new(extractor), Arc::new(analyzer));
        Ok(Self::new(source, Arc::new(cache), &config.storage.data_dir))
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    pub fn source(&self) -> &Arc<dyn CandidateSource> {
        &self.source
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Document to extract for a candidate
    ///
    /// A local file present in the data directory wins over the resume URL.
    pub fn extraction_reference(&self, record: &CandidateRecord) -> Option<DocumentReference> {
        let local = record.local_filename.trim();
        if !local.is_empty() && self.data_dir.join(local).is_file() {
            return Some(DocumentReference::Path(PathBuf::from(local)));
        }

        DocumentReference::parse(&record.resume_url)
    }

    /// Every candidate with metadata attached
    pub async fn load_candidates(&self) -> Result<Vec<Candidate>> {
        let records = self.source.load().await?;
        let items: Vec<_> = records
            .iter()
            .map(|r| (r.id, self.extraction_reference(r)))
            .collect();

        let metadata = self.cache.get_or_compute_many(&items).await;

        Ok(records
            .into_iter()
            .zip(metadata)
            .map(|(record, entry)| Candidate::from_record(record, entry))
            .collect())
    }

    /// Score each candidate against the job titled like its role
    ///
    /// Candidates whose role has no job score zero. When titles repeat the
    /// last job wins.
    pub fn score_by_role(&self, candidates: &[Candidate], jobs: &[JobDescription]) -> Vec<ScoreResult> {
        let by_title: HashMap<&str, &JobDescription> =
            jobs.iter().map(|j| (j.title.as_str(), j)).collect();

        candidates
            .iter()
            .map(|c| match by_title.get(c.role.as_str()) {
                Some(job) => self.scorer.score_job(&c.resume_text, job),
                None => ScoreResult::zero(),
            })
            .collect()
    }

    /// Score every candidate against a free-text job description
    pub async fn analyze(&self, description: &str) -> Result<Vec<AnalysisResult>> {
        let candidates = self.load_candidates().await?;

        Ok(candidates
            .into_iter()
            .map(|c| {
                let result = self.scorer.score(&c.resume_text, description);
                AnalysisResult {
                    id: c.id,
                    score: result.score,
                    matched_keywords: result.matched_keywords,
                }
            })
            .collect())
    }

    /// Fresh resume text for one candidate
    ///
    /// Tries the resume URL first, then the local file. Returns `None` when
    /// neither yields text and `NotFound` when the candidate does not exist.
    pub async fn resume_text(&self, id: CandidateId) -> Result<Option<String>> {
        let record = self.find_record(id).await?;

        let extractor = self.cache.extractor();
        let references = [
            DocumentReference::parse(&record.resume_url),
            DocumentReference::parse(&record.local_filename),
        ];

        for reference in references.iter().flatten() {
            let text = extractor.extract_text(reference).await;
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// Original resume file of one candidate
    ///
    /// The hosted copy wins when the candidate has a URL; if it cannot be
    /// fetched the caller gets a redirect instead. Otherwise the local file is
    /// read from the search directories. `None` when neither exists.
    pub async fn resume_download(&self, id: CandidateId) -> Result<Option<ResumeDownload>> {
        let record = self.find_record(id).await?;
        let extractor = self.cache.extractor();
        let local_filename = record.local_filename.trim();

        if let Some(reference) =
            DocumentReference::parse(&record.resume_url).filter(DocumentReference::is_remote)
        {
            let filename = if local_filename.is_empty() {
                format!("resume_{id}.pdf")
            } else {
                local_filename.to_string()
            };

            return Ok(Some(match extractor.load_bytes(&reference).await {
                Ok(bytes) => ResumeDownload::File { filename, bytes },
                Err(e) => {
                    warn!(candidate_id = %id, error = %e, "Resume download failed, redirecting");
                    ResumeDownload::Redirect(record.resume_url.trim().to_string())
                }
            }));
        }

        let Some(reference) = DocumentReference::parse(local_filename) else {
            return Ok(None);
        };
        match extractor.load_bytes(&reference).await {
            Ok(bytes) => Ok(Some(ResumeDownload::File {
                filename: local_filename.to_string(),
                bytes,
            })),
            Err(e) => {
                debug!(candidate_id = %id, error = %e, "No local resume file");
                Ok(None)
            }
        }
    }

    async fn find_record(&self, id: CandidateId) -> Result<CandidateRecord> {
        self.source
            .load()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| HrError::NotFound(format!("Candidate {id}")))
    }
}

async fn open_database(
    config: &AppConfig,
) -> Option<(Arc<dyn CandidateSource>, Arc<dyn CacheStore>)> {
    config.database.postgres_url.as_ref()?;

    let pool = match postgres::connect(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "Database unavailable, using local files");
            return None;
        }
    };

    let store = PgCacheStore::new(pool.clone());
    if let Err(e) = store.ensure_schema().await {
        warn!(error = %e, "Metadata table unavailable, using local files");
        return None;
    }

    Some((Arc::new(PgCandidateSource::new(pool)), Arc::new(store)))
}
