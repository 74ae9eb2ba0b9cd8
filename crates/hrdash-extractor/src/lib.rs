//! hrdash extractor - Resume classification and keyword analysis
//!
//! Rule-based analysis of resume text against a shared
//! `ClassificationDictionary`:
//! - `RoleClassifier`: one role label per resume by keyword voting
//! - `EntityExtractor`: skill, location and language tags
//! - `RelevanceScorer`: keyword overlap between a resume and a job description
//!
//! Everything here is a pure function of its inputs and the dictionary.

pub mod classifier;
pub mod dictionary;
pub mod entities;
pub mod scoring;

use std::sync::Arc;

pub use classifier::{RoleClassifier, RoleScore};
pub use dictionary::{ClassificationDictionary, DictionaryError, RoleRule, SENIOR_ROLE};
pub use entities::EntityExtractor;
pub use scoring::{normalize, RelevanceScorer, STOPWORDS};

use hrdash_core::{ClassifierConfig, EntityTags, RoleLabel};

/// Classifier and entity extractor sharing one dictionary
#[derive(Debug, Clone)]
pub struct ResumeAnalyzer {
    pub classifier: RoleClassifier,
    pub entities: EntityExtractor,
}

impl ResumeAnalyzer {
    pub fn new(dictionary: Arc<ClassificationDictionary>) -> Self {
        Self {
            classifier: RoleClassifier::new(dictionary.clone()),
            entities: EntityExtractor::new(dictionary),
        }
    }

    /// Use the configured dictionary file, or the built-in dictionary
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, DictionaryError> {
        let dictionary = match &config.dictionary_path {
            Some(path) => ClassificationDictionary::from_toml_file(path)?,
            None => ClassificationDictionary::builtin(),
        };
        Ok(Self::new(Arc::new(dictionary)))
    }

    /// Role and tags for a resume text
    pub fn analyze(&self, text: &str) -> (RoleLabel, EntityTags) {
        (self.classifier.classify(text), self.entities.extract(text))
    }
}

impl Default for ResumeAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(ClassificationDictionary::builtin()))
    }
}
