//! CSV candidate source
//!
//! Reads the form-submission export. The row index (0-based, header
//! excluded) is the candidate id, so ids stay stable as long as rows are
//! only appended.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hrdash_core::{CandidateId, CandidateRecord, CandidateSource, HrError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

static PDF_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([a-zA-Z0-9_-]+\.pdf)").expect("hard-coded regex must compile")
});

/// Resume file name derived from its download URL
///
/// The last path segment (query string removed) is used when it names a
/// PDF. Otherwise the first `*.pdf` token anywhere in the URL wins, and if
/// there is none the last segment is kept as-is.
pub fn local_filename_from_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    let path = url.split('?').next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default().trim();

    if last.is_empty() || last.to_lowercase().ends_with(".pdf") {
        return last.to_string();
    }

    PDF_NAME
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| last.to_string(), |m| m.as_str().to_string())
}

/// One row of the submission export
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubmissionRow {
    #[serde(rename = "Submission time")]
    submission_time: String,
    #[serde(rename = "First name")]
    first_name: String,
    #[serde(rename = "Last name")]
    last_name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Are you currently working?")]
    working_status: String,
    #[serde(rename = "Attach you Resume")]
    resume: String,
}

impl SubmissionRow {
    fn into_record(self, index: usize) -> CandidateRecord {
        let resume_url = self.resume.trim().to_string();
        let local_filename = local_filename_from_url(&resume_url);

        CandidateRecord {
            id: CandidateId(index as i64),
            submission_time: self.submission_time,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            working_status: self.working_status,
            resume_url,
            local_filename,
        }
    }
}

/// Parse the export from memory
///
/// A leading UTF-8 byte order mark is ignored. Rows that fail to parse are
/// skipped but still consume their index.
pub fn parse_submissions(content: &str) -> Vec<CandidateRecord> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<SubmissionRow>().enumerate() {
        match row {
            Ok(row) => records.push(row.into_record(index)),
            Err(e) => warn!(row = index, error = %e, "Skipping malformed submission row"),
        }
    }
    records
}

/// Candidates from the local CSV export
pub struct CsvCandidateSource {
    path: PathBuf,
}

impl CsvCandidateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CandidateSource for CsvCandidateSource {
    async fn load(&self) -> Result<Vec<CandidateRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Submission export missing");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(HrError::StorageError(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        Ok(parse_submissions(&content))
    }

    fn name(&self) -> &str {
        "csv"
    }
}
