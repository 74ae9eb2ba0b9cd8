//! Dictionary-based entity tagging
//!
//! Skills and spoken languages must appear as whole words so that "Java"
//! is not found inside "JavaScript". Locations only need to appear as a
//! substring. Matching is case-insensitive and tags come back in dictionary
//! order with their dictionary casing.

use std::sync::Arc;

use hrdash_core::EntityTags;
use regex::Regex;

use crate::ClassificationDictionary;

/// Tag with a compiled whole-word matcher
#[derive(Debug, Clone)]
struct WordTag {
    tag: String,
    pattern: Regex,
}

impl WordTag {
    fn compile(tag: &str) -> Option<Self> {
        let pattern = format!(r"\b{}\b", regex::escape(&tag.to_lowercase()));
        Regex::new(&pattern).ok().map(|pattern| Self {
            tag: tag.to_string(),
            pattern,
        })
    }
}

/// Extracts skill, location and language tags from resume text
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    dictionary: Arc<ClassificationDictionary>,
    skills: Vec<WordTag>,
    languages: Vec<WordTag>,
    /// (display tag, lowercased tag)
    locations: Vec<(String, String)>,
}

impl EntityExtractor {
    /// Compile matchers for every tag in the dictionary
    pub fn new(dictionary: Arc<ClassificationDictionary>) -> Self {
        let skills = dictionary
            .skills
            .iter()
            .filter_map(|s| WordTag::compile(s))
            .collect();
        let languages = dictionary
            .languages
            .iter()
            .filter_map(|l| WordTag::compile(l))
            .collect();
        let locations = dictionary
            .locations
            .iter()
            .map(|l| (l.clone(), l.to_lowercase()))
            .collect();

        Self {
            dictionary,
            skills,
            languages,
            locations,
        }
    }

    /// Shared dictionary
    pub fn dictionary(&self) -> &Arc<ClassificationDictionary> {
        &self.dictionary
    }

    /// Tag a text
    pub fn extract(&self, text: &str) -> EntityTags {
        let text_lower = text.to_lowercase();

        let words = |tags: &[WordTag]| -> Vec<String> {
            tags.iter()
                .filter(|t| t.pattern.is_match(&text_lower))
                .map(|t| t.tag.clone())
                .collect()
        };

        EntityTags {
            skills: words(&self.skills),
            locations: self
                .locations
                .iter()
                .filter(|(_, lower)| text_lower.contains(lower.as_str()))
                .map(|(tag, _)| tag.clone())
                .collect(),
            languages: words(&self.languages),
        }
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(Arc::new(ClassificationDictionary::builtin()))
    }
}
