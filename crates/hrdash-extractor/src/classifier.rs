//! Rule-based role classification
//!
//! Every role starts at zero and gains one point per keyword present in the
//! lowercased text (presence, not frequency). Seniority signals add a bonus
//! to the senior role and the intern signal adds a bonus to every internship
//! role. The strictly highest score wins, ties go to the earlier role, and a
//! best score of zero means `Unclassified`.

use std::sync::Arc;

use hrdash_core::RoleLabel;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ClassificationDictionary;

/// Score of one role for a given text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleScore {
    pub label: String,
    pub score: u32,
    /// Keywords of this role found in the text
    pub matched_keywords: Vec<String>,
    /// Bonus points included in `score`
    pub bonus: u32,
}

/// Keyword-voting role classifier
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    dictionary: Arc<ClassificationDictionary>,
    seniority_pattern: Option<Regex>,
}

impl RoleClassifier {
    /// Create a classifier over a shared dictionary
    pub fn new(dictionary: Arc<ClassificationDictionary>) -> Self {
        let seniority_pattern = if dictionary.seniority_pattern.is_empty() {
            None
        } else {
            // Dictionaries loaded from files are validated; an invalid
            // pattern here only disables the pattern signal.
            Regex::new(&dictionary.seniority_pattern).ok()
        };

        Self {
            dictionary,
            seniority_pattern,
        }
    }

    /// Shared dictionary
    pub fn dictionary(&self) -> &Arc<ClassificationDictionary> {
        &self.dictionary
    }

    /// Whether the lowercased text signals seniority
    fn signals_seniority(&self, text_lower: &str) -> bool {
        self.dictionary
            .seniority_signals
            .iter()
            .any(|signal| text_lower.contains(signal.as_str()))
            || self
                .seniority_pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(text_lower))
    }

    /// Per-role scores in declaration order
    pub fn explain(&self, text: &str) -> Vec<RoleScore> {
        let text_lower = text.to_lowercase();
        let senior = self.signals_seniority(&text_lower);
        let intern = text_lower.contains(self.dictionary.intern_signal.as_str());

        self.dictionary
            .roles
            .iter()
            .map(|rule| {
                let matched_keywords: Vec<String> = rule
                    .keywords
                    .iter()
                    .filter(|kw| text_lower.contains(kw.as_str()))
                    .cloned()
                    .collect();

                let mut bonus = 0;
                if senior && rule.label == self.dictionary.senior_role {
                    bonus += self.dictionary.seniority_bonus;
                }
                if intern && rule.label.contains(self.dictionary.intern_label_marker.as_str()) {
                    bonus += self.dictionary.intern_bonus;
                }

                RoleScore {
                    label: rule.label.clone(),
                    score: matched_keywords.len() as u32 + bonus,
                    matched_keywords,
                    bonus,
                }
            })
            .collect()
    }

    /// Assign exactly one role, or `Unclassified`
    pub fn classify(&self, text: &str) -> RoleLabel {
        let mut best: Option<&RoleScore> = None;
        let scores = self.explain(text);

        for score in &scores {
            if score.score > best.map_or(0, |b| b.score) {
                best = Some(score);
            }
        }

        best.map_or_else(RoleLabel::unclassified, |b| RoleLabel::new(&b.label))
    }
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(Arc::new(ClassificationDictionary::builtin()))
    }
}
