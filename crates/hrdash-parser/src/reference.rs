//! Document references
//!
//! Resumes are referenced by raw bytes (uploads), a file name relative to the
//! data directory, or a remote URL.

use std::path::PathBuf;

/// Where a document's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentReference {
    /// Bytes already in memory; `name` helps format detection
    Bytes { name: Option<String>, data: Vec<u8> },
    /// Absolute path, or a path relative to the configured search directories
    Path(PathBuf),
    /// Remote locator with a URI scheme
    Remote(String),
}

impl DocumentReference {
    /// Interpret a raw reference string
    ///
    /// Anything carrying a URI scheme (`scheme://...`) is remote; everything
    /// else is a path. Blank strings are no reference at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if uri_scheme(raw).is_some() {
            Some(Self::Remote(raw.to_string()))
        } else {
            Some(Self::Path(PathBuf::from(raw)))
        }
    }

    /// In-memory document
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: None,
            data: data.into(),
        }
    }

    /// In-memory document with a file name hint
    pub fn named_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: Some(name.into()),
            data: data.into(),
        }
    }

    /// URI scheme of a remote reference, lowercased
    pub fn scheme(&self) -> Option<String> {
        match self {
            Self::Remote(url) => uri_scheme(url).map(|s| s.to_ascii_lowercase()),
            _ => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl std::fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes { name: Some(name), data } => write!(f, "{name} ({} bytes)", data.len()),
            Self::Bytes { name: None, data } => write!(f, "<memory> ({} bytes)", data.len()),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Scheme part of `scheme://rest`, if the string has a well-formed one
fn uri_scheme(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;

    if first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        Some(scheme)
    } else {
        None
    }
}

/// Path portion of a URL without query string or fragment
pub(crate) fn url_path(url: &str) -> &str {
    let without_fragment = url.split('#').next().unwrap_or(url);
    without_fragment.split('?').next().unwrap_or(without_fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote() {
        let reference =
            DocumentReference::parse("https://files.example.com/resumes/cv.pdf?token=1").unwrap();
        assert!(reference.is_remote());
        assert_eq!(reference.scheme().as_deref(), Some("https"));
    }

    #[test]
    fn test_parse_local() {
        assert_eq!(
            DocumentReference::parse(" cv_sara.pdf "),
            Some(DocumentReference::Path(PathBuf::from("cv_sara.pdf")))
        );
        assert_eq!(DocumentReference::parse("   "), None);
    }

    #[test]
    fn test_non_http_schemes_are_remote() {
        let reference = DocumentReference::parse("S3://bucket/cv.pdf").unwrap();
        assert_eq!(reference.scheme().as_deref(), Some("s3"));
    }

    #[test]
    fn test_malformed_scheme_is_a_path() {
        assert!(!DocumentReference::parse("://nothing").unwrap().is_remote());
        assert!(!DocumentReference::parse("1abc://x").unwrap().is_remote());
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("https://x.test/a/cv.pdf?dl=1#p2"), "https://x.test/a/cv.pdf");
        assert_eq!(url_path("https://x.test/a/cv.pdf"), "https://x.test/a/cv.pdf");
    }

    #[test]
    fn test_display() {
        let reference = DocumentReference::named_bytes("upload.pdf", vec![1, 2, 3]);
        assert_eq!(reference.to_string(), "upload.pdf (3 bytes)");
    }
}
