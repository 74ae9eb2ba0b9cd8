//! Classification dictionary
//!
//! The ordered role rules and tag vocabularies shared by the role classifier
//! and the entity extractor. Declaration order is significant everywhere:
//! classification ties go to the earlier role and tags are reported in
//! dictionary order.
//!
//! The built-in dictionary can be replaced by a TOML file:
//!
//! ```toml
//! senior_role = "Senior Software Engineer"
//! skills = ["Rust", "Python"]
//!
//! [[roles]]
//! label = "Senior Software Engineer"
//! keywords = ["senior", "lead", "architect"]
//! ```
//!
//! Sections missing from the file keep their built-in values.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Built-in Vocabulary
// ============================================================================

const BUILTIN_ROLES: &[(&str, &[&str])] = &[
    (
        "Business Development / Operations Intern",
        &[
            "business development",
            "operations",
            "sales",
            "marketing",
            "bdr",
            "sdr",
            "strategy",
            "growth",
            "intern",
        ],
    ),
    (
        "Junior Software Engineer",
        &[
            "junior",
            "entry level",
            "graduate",
            "associate",
            "developer",
            "software engineer",
            "computer science",
        ],
    ),
    (
        "Senior Software Engineer",
        &[
            "senior",
            "lead",
            "architect",
            "principal",
            "staff",
            "years experience",
            "expert",
            "advanced",
        ],
    ),
    (
        "Software Engineer Internship (Europe)",
        &[
            "intern",
            "internship",
            "europe",
            "germany",
            "uk",
            "france",
            "remote eu",
            "summer",
        ],
    ),
    (
        "Software Engineer Internship (Riyadh)",
        &[
            "intern",
            "internship",
            "riyadh",
            "saudi",
            "ksa",
            "middle east",
            "summer",
        ],
    ),
    (
        "UX Designer Intern",
        &[
            "ux",
            "ui",
            "product design",
            "designer",
            "figma",
            "wireframe",
            "prototype",
            "user experience",
            "intern",
        ],
    ),
];

const BUILTIN_SKILLS: &[&str] = &[
    "Python",
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Java",
    "C++",
    "C#",
    "SQL",
    "NoSQL",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Git",
    "Figma",
    "Photoshop",
    "Salesforce",
    "Excel",
    "PowerPoint",
    "Communication",
    "Leadership",
    "Agile",
    "Scrum",
    "FastAPI",
    "Django",
    "Insurtech",
    "Cloud Run",
    "PostgreSQL",
    "Machine Learning",
    "Algorithms",
    "Backend",
    "B2B",
    "UX Design",
    "UI Design",
    "Product Design",
    "User Research",
    "Wireframes",
    "Prototypes",
    "Digital Onboarding",
    "Embedded Insurance",
    "Sales",
    "Operations",
    "Compliance",
    "Strategic Planning",
    "Market Research",
    "Financial Forecasting",
    "Claude Code",
    "AI-Assisted Development",
    "Regulatory Compliance",
    // Repeated entry, collapsed by `normalize`
    "Embedded Insurance",
    "Policy Issuance",
    "Customer Success",
    "Market Analysis",
    "B2B Sales",
];

const BUILTIN_LOCATIONS: &[&str] = &[
    "Riyadh",
    "Jeddah",
    "Dubai",
    "London",
    "Berlin",
    "Paris",
    "New York",
    "San Francisco",
    "Remote",
    "Cairo",
    "Amman",
    "India",
    "Pakistan",
];

const BUILTIN_LANGUAGES: &[&str] = &[
    "English", "Arabic", "French", "German", "Spanish", "Urdu", "Hindi",
];

/// Role receiving the seniority bonus
pub const SENIOR_ROLE: &str = "Senior Software Engineer";

// ============================================================================
// Dictionary Types
// ============================================================================

/// Errors loading a dictionary file
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dictionary: {0}")]
    Parse(String),

    #[error("Invalid seniority pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Dictionary declares no roles")]
    NoRoles,
}

/// One classifiable role and the keywords that vote for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl RoleRule {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Role rules, tag vocabularies and bonus heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationDictionary {
    /// Roles in declaration order
    pub roles: Vec<RoleRule>,

    /// Skill tags (whole-word match)
    pub skills: Vec<String>,

    /// Location tags (substring match)
    pub locations: Vec<String>,

    /// Spoken language tags (whole-word match)
    pub languages: Vec<String>,

    /// Substrings signalling seniority
    pub seniority_signals: Vec<String>,

    /// Regex signalling seniority, matched against lowercased text
    pub seniority_pattern: String,

    /// Role label receiving the seniority bonus
    pub senior_role: String,

    /// Points added to `senior_role` when seniority is signalled
    pub seniority_bonus: u32,

    /// Substring of the text signalling an internship application
    pub intern_signal: String,

    /// Substring of role labels that designate internships
    pub intern_label_marker: String,

    /// Points added to every internship role when the intern signal is present
    pub intern_bonus: u32,
}

impl Default for ClassificationDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Drop repeated entries, keeping the first occurrence
fn dedupe(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

impl ClassificationDictionary {
    /// The built-in recruiting dictionary
    pub fn builtin() -> Self {
        let mut dictionary = Self {
            roles: BUILTIN_ROLES
                .iter()
                .map(|(label, keywords)| RoleRule::new(*label, keywords))
                .collect(),
            skills: owned(BUILTIN_SKILLS),
            locations: owned(BUILTIN_LOCATIONS),
            languages: owned(BUILTIN_LANGUAGES),
            seniority_signals: owned(&["senior", "lead"]),
            seniority_pattern: r"\d+\+\s*years".to_string(),
            senior_role: SENIOR_ROLE.to_string(),
            seniority_bonus: 2,
            intern_signal: "intern".to_string(),
            intern_label_marker: "Intern".to_string(),
            intern_bonus: 1,
        };
        dictionary.normalize();
        dictionary
    }

    /// Parse a TOML dictionary
    pub fn from_toml_str(content: &str) -> Result<Self, DictionaryError> {
        let mut dictionary: Self =
            toml::from_str(content).map_err(|e| DictionaryError::Parse(e.to_string()))?;
        dictionary.normalize();
        dictionary.validate()?;
        Ok(dictionary)
    }

    /// Load a TOML dictionary from disk
    pub fn from_toml_file(path: &Path) -> Result<Self, DictionaryError> {
        let content = std::fs::read_to_string(path).map_err(|e| DictionaryError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Lowercase keywords and collapse duplicates
    ///
    /// Role keywords and signals are matched against lowercased text, so they
    /// are stored lowercased. Tags keep their display casing.
    pub fn normalize(&mut self) {
        let mut seen_labels = HashSet::new();
        self.roles.retain(|rule| seen_labels.insert(rule.label.clone()));

        for rule in &mut self.roles {
            for keyword in &mut rule.keywords {
                *keyword = keyword.to_lowercase();
            }
            dedupe(&mut rule.keywords);
        }

        for signal in &mut self.seniority_signals {
            *signal = signal.to_lowercase();
        }
        self.intern_signal = self.intern_signal.to_lowercase();

        dedupe(&mut self.skills);
        dedupe(&mut self.locations);
        dedupe(&mut self.languages);
        dedupe(&mut self.seniority_signals);
    }

    /// Check the dictionary is usable
    pub fn validate(&self) -> Result<(), DictionaryError> {
        if self.roles.is_empty() {
            return Err(DictionaryError::NoRoles);
        }

        if !self.seniority_pattern.is_empty() {
            Regex::new(&self.seniority_pattern).map_err(|e| DictionaryError::InvalidPattern {
                pattern: self.seniority_pattern.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// Role labels in declaration order
    pub fn role_labels(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|rule| rule.label.as_str())
    }

    /// Whether `label` is one of the declared roles
    pub fn has_role(&self, label: &str) -> bool {
        self.roles.iter().any(|rule| rule.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_role_order() {
        let dictionary = ClassificationDictionary::builtin();
        let labels: Vec<&str> = dictionary.role_labels().collect();

        assert_eq!(
            labels,
            vec![
                "Business Development / Operations Intern",
                "Junior Software Engineer",
                "Senior Software Engineer",
                "Software Engineer Internship (Europe)",
                "Software Engineer Internship (Riyadh)",
                "UX Designer Intern",
            ]
        );
        assert!(dictionary.has_role(SENIOR_ROLE));
        dictionary.validate().unwrap();
    }

    #[test]
    fn test_builtin_skills_are_deduplicated() {
        let dictionary = ClassificationDictionary::builtin();
        let embedded = dictionary
            .skills
            .iter()
            .filter(|s| s.as_str() == "Embedded Insurance")
            .count();

        assert_eq!(embedded, 1);
        assert_eq!(dictionary.skills.len(), BUILTIN_SKILLS.len() - 1);
        // First declaration keeps its position
        assert_eq!(dictionary.skills[41], "Embedded Insurance");
    }

    #[test]
    fn test_toml_override_keeps_missing_sections() {
        let toml = r#"
            skills = ["Rust", "Go", "Rust"]

            [[roles]]
            label = "Platform Engineer"
            keywords = ["Kubernetes", "Terraform", "kubernetes"]

            [[roles]]
            label = "Data Analyst"
            keywords = ["sql", "dashboards"]
        "#;

        let dictionary = ClassificationDictionary::from_toml_str(toml).unwrap();
        assert_eq!(dictionary.skills, vec!["Rust", "Go"]);
        assert_eq!(dictionary.roles[0].keywords, vec!["kubernetes", "terraform"]);
        assert_eq!(dictionary.roles[1].label, "Data Analyst");
        assert_eq!(dictionary.languages, owned(BUILTIN_LANGUAGES));
        assert_eq!(dictionary.senior_role, SENIOR_ROLE);
    }

    #[test]
    fn test_toml_without_roles_is_rejected() {
        let err = ClassificationDictionary::from_toml_str("roles = []").unwrap_err();
        assert!(matches!(err, DictionaryError::NoRoles));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = ClassificationDictionary::from_toml_str(r#"seniority_pattern = "(unclosed""#)
            .unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidPattern { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err =
            ClassificationDictionary::from_toml_file(Path::new("/no/such/dictionary.toml"))
                .unwrap_err();
        assert!(matches!(err, DictionaryError::Read { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.toml");
        std::fs::write(
            &path,
            "[[roles]]\nlabel = \"QA Engineer\"\nkeywords = [\"testing\", \"qa\"]\n",
        )
        .unwrap();

        let dictionary = ClassificationDictionary::from_toml_file(&path).unwrap();
        assert_eq!(dictionary.roles.len(), 1);
        assert!(dictionary.has_role("QA Engineer"));
    }
}
