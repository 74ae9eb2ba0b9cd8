//! hrdash parser - Document parsing and text extraction
//!
//! Supports parsing of:
//! - PDF resumes
//! - Microsoft Word (DOCX) resumes and job description documents
//! - Plain text and Markdown files
//!
//! Each parser implements the `DocumentParser` trait and produces a
//! `ParsedDocument`. The `TextExtractor` sits on top of the parsers: it
//! resolves a `DocumentReference` (bytes, local path or remote URL) and
//! degrades every failure to an empty string.

use std::path::Path;
use thiserror::Error;

pub mod docx;
pub mod extractor;
pub mod fetch;
pub mod jobs;
pub mod pdf;
pub mod reference;

pub use docx::DocxParser;
pub use extractor::{ExtractionFailure, TextExtractor};
pub use fetch::HttpFetcher;
pub use jobs::{parse_job_descriptions, parse_job_document, DEFAULT_KNOWN_TITLES};
pub use pdf::PdfParser;
pub use reference::DocumentReference;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during document parsing
#[derive(Error, Debug)]
pub enum ParserError {
    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PDF parsing error
    #[error("PDF parsing error: {0}")]
    PdfError(String),

    /// DOCX parsing error
    #[error("DOCX parsing error: {0}")]
    DocxError(String),

    /// Encoding error
    #[error("Text encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Parsed Document Types
// ============================================================================

/// A parsed document with extracted content
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Where the document came from (path, URL or caller-supplied name)
    pub source: String,

    /// Detected file type
    pub file_type: FileType,

    /// Text of each page; single-element for formats without pages
    pub pages: Vec<String>,
}

impl ParsedDocument {
    /// Create a new parsed document
    pub fn new(source: impl Into<String>, file_type: FileType) -> Self {
        Self {
            source: source.into(),
            file_type,
            pages: Vec::new(),
        }
    }

    /// Set page texts
    pub fn with_pages(mut self, pages: Vec<String>) -> Self {
        self.pages = pages;
        self
    }

    /// Plain text: every page followed by a newline
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.pages.iter().map(|p| p.len() + 1).sum());
        for page in &self.pages {
            text.push_str(page);
            text.push('\n');
        }
        text
    }

    /// True when no page contains anything but whitespace
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get total word count (approximate)
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.split_whitespace().count()).sum()
    }

    /// Non-empty trimmed lines across all pages
    pub fn paragraphs(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|p| p.lines())
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Markdown,
    PlainText,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "md" | "markdown" => Self::Markdown,
            "txt" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Detect file type from leading bytes
    ///
    /// DOCX files are zip archives, so any zip header is reported as DOCX.
    /// Valid UTF-8 without a known signature is treated as plain text.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"%PDF") {
            Self::Pdf
        } else if bytes.starts_with(b"PK\x03\x04") {
            Self::Docx
        } else if !bytes.is_empty() && std::str::from_utf8(bytes).is_ok() {
            Self::PlainText
        } else {
            Self::Unknown
        }
    }

    /// Get MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Markdown => "text/markdown",
            Self::PlainText => "text/plain",
            Self::Unknown => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Markdown => write!(f, "markdown"),
            Self::PlainText => write!(f, "text"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for document parsers
pub trait DocumentParser: Send + Sync {
    /// Parse a document held in memory; `source` names it in errors
    fn parse_bytes(&self, source: &str, bytes: &[u8]) -> Result<ParsedDocument>;

    /// Get supported file types
    fn supported_types(&self) -> &[FileType];

    /// Parse a document from a file path
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        self.parse_bytes(&path.display().to_string(), &bytes)
    }

    /// Check if this parser can handle a file type
    fn can_parse(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }
}

// ============================================================================
// Parser Registry
// ============================================================================

/// Registry of available parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with the PDF, DOCX and plain text parsers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfParser::new());
        registry.register(DocxParser::new());
        registry.register(PlainTextParser);
        registry
    }

    /// Register a parser
    pub fn register<P: DocumentParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find a parser for a file type
    pub fn find_parser(&self, file_type: FileType) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(file_type))
            .map(|p| p.as_ref())
    }

    /// Parse in-memory bytes, detecting the type from `source` then content
    pub fn parse_bytes(&self, source: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        let file_type = match FileType::from_path(Path::new(source)) {
            FileType::Unknown => FileType::sniff(bytes),
            known => known,
        };

        if file_type == FileType::Unknown {
            return Err(ParserError::UnsupportedFormat(source.to_string()));
        }

        let parser = self
            .find_parser(file_type)
            .ok_or_else(|| ParserError::UnsupportedFormat(file_type.to_string()))?;

        parser.parse_bytes(source, bytes)
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        self.parse_bytes(&path.display().to_string(), &bytes)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Plain Text Parser
// ============================================================================

/// Plain text parser
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn parse_bytes(&self, source: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        let content = String::from_utf8(bytes.to_vec())
            .map_err(|e| ParserError::EncodingError(format!("{source}: {e}")))?;

        Ok(ParsedDocument::new(source, FileType::PlainText).with_pages(vec![content]))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::PlainText, FileType::Markdown]
    }
}

// ============================================================================
// Tests
// ============================================================================
