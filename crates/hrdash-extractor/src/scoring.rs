//! Lexical relevance scoring
//!
//! Scores a resume against a job description by the share of the job's
//! important keywords that also occur in the resume. Both texts are
//! lowercased and stripped to ASCII letters, digits and whitespace; the
//! job's tokens minus stopwords and short tokens form the keyword set.

use std::collections::HashSet;

use hrdash_core::{JobDescription, ScoreResult};

/// Words never treated as important keywords
pub const STOPWORDS: &[&str] = &[
    "and", "the", "of", "in", "to", "a", "is", "for", "with", "on", "at", "by", "an", "be",
    "this", "that", "it", "are", "from", "or", "as", "if", "but", "not",
];

/// Tokens of this length or shorter are ignored
const MAX_IGNORED_LEN: usize = 2;

/// Lowercase and keep only ASCII alphanumerics and whitespace
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Keyword-overlap scorer
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    stopwords: HashSet<String>,
}

impl RelevanceScorer {
    pub fn new() -> Self {
        Self::with_stopwords(STOPWORDS)
    }

    /// Scorer with a custom stopword list
    pub fn with_stopwords(stopwords: &[&str]) -> Self {
        Self {
            stopwords: stopwords.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Important keywords of a job description, in first-occurrence order
    pub fn important_keywords(&self, job_description: &str) -> Vec<String> {
        let normalized = normalize(job_description);
        let mut seen = HashSet::new();

        normalized
            .split_whitespace()
            .filter(|token| token.len() > MAX_IGNORED_LEN && !self.stopwords.contains(*token))
            .filter(|token| seen.insert(*token))
            .map(str::to_string)
            .collect()
    }

    /// Score a resume against a job description text
    ///
    /// Returns zero with no matches when either text is empty or the job
    /// description has no important keywords.
    pub fn score(&self, resume_text: &str, job_description: &str) -> ScoreResult {
        if resume_text.is_empty() || job_description.is_empty() {
            return ScoreResult::zero();
        }

        let keywords = self.important_keywords(job_description);
        if keywords.is_empty() {
            return ScoreResult::zero();
        }

        let resume = normalize(resume_text);
        let resume_tokens: HashSet<&str> = resume.split_whitespace().collect();

        let matched_keywords: Vec<String> = keywords
            .iter()
            .filter(|kw| resume_tokens.contains(kw.as_str()))
            .cloned()
            .collect();

        let ratio = matched_keywords.len() as f64 / keywords.len() as f64;
        let score = (ratio * 100.0 * 10.0).round() / 10.0;

        ScoreResult {
            score,
            matched_keywords,
        }
    }

    /// Score a resume against a job's description
    pub fn score_job(&self, resume_text: &str, job: &JobDescription) -> ScoreResult {
        self.score(resume_text, &job.description)
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new()
    }
}
