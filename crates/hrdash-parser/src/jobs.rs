//! Job description document parsing
//!
//! Splits a Word document listing several open positions into
//! `JobDescription`s. A paragraph naming a known job title starts a new job;
//! every following paragraph belongs to that job's description.

use std::path::Path;

use hrdash_core::JobDescription;

use crate::{DocumentParser, DocxParser, Result};

/// Titles recognised as job headings
pub const DEFAULT_KNOWN_TITLES: &[&str] = &[
    "Operations Manager Associate",
    "Junior Software Engineer",
    "Business Development / Operations CO-OP Trainee",
    "Product Designer",
    "Sales & Operations Trainee",
    "Senior Software Engineer",
    "Business Development / Operations Intern",
    "UX Designer Intern",
];

/// Location assumed when the description names none
pub const DEFAULT_LOCATION: &str = "Riyadh (Hybrid)";

/// Headings longer than this must say HIRING to count as titles
const SHORT_HEADING_CHARS: usize = 60;

fn is_title(paragraph: &str, known_titles: &[&str]) -> bool {
    known_titles.iter().any(|title| {
        paragraph.starts_with(title)
            || (paragraph.contains(title)
                && (paragraph.contains("HIRING")
                    || paragraph.chars().count() < SHORT_HEADING_CHARS))
    })
}

fn infer_location(description: &str) -> &'static str {
    if description.contains("Remote") {
        "Remote"
    } else if description.contains("Europe") {
        "Europe"
    } else {
        DEFAULT_LOCATION
    }
}

fn finish(title: String, body: Vec<&str>, jobs: &mut Vec<JobDescription>) {
    let mut job = JobDescription::new(jobs.len() as u32 + 1, title, body.join("\n"));
    job.location = Some(infer_location(&job.description).to_string());
    jobs.push(job);
}

/// Split document paragraphs into job descriptions
///
/// Blank paragraphs are skipped, as is anything before the first title.
/// Ids are assigned from 1 in document order.
pub fn parse_job_descriptions<S: AsRef<str>>(
    paragraphs: &[S],
    known_titles: &[&str],
) -> Vec<JobDescription> {
    let mut jobs = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for paragraph in paragraphs {
        let text = paragraph.as_ref().trim();
        if text.is_empty() {
            continue;
        }

        if is_title(text, known_titles) {
            if let Some((title, body)) = current.take() {
                finish(title, body, &mut jobs);
            }
            let title = text.replace("- HIRING", "").trim().to_string();
            current = Some((title, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(text);
        }
    }

    if let Some((title, body)) = current {
        finish(title, body, &mut jobs);
    }

    jobs
}

/// Parse a DOCX job description document from disk
pub fn parse_job_document(path: &Path, known_titles: &[&str]) -> Result<Vec<JobDescription>> {
    let document = DocxParser::new().parse(path)?;
    Ok(parse_job_descriptions(&document.paragraphs(), known_titles))
}
