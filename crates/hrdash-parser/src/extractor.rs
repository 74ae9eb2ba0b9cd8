//! Text extraction from document references
//!
//! `TextExtractor::try_extract` reports why a document yielded no text;
//! `TextExtractor::extract_text` collapses every failure into an empty
//! string so that one bad resume never interrupts a batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use hrdash_core::{DocumentFetcher, FetchConfig, StorageConfig};
use thiserror::Error;
use tracing::{debug, warn};

use crate::reference::url_path;
use crate::{DocumentReference, HttpFetcher, ParserError, ParserRegistry};

/// Why a document produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// Local file missing from every search directory
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Remote document could not be downloaded
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// Remote reference with a scheme we cannot fetch
    #[error("Unsupported URI scheme: {0}")]
    UnsupportedScheme(String),

    /// Bytes are not a format any parser understands
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Parser rejected the document
    #[error("Corrupt document {source_name}: {reason}")]
    Corrupt { source_name: String, reason: String },

    /// Document parsed but contains no text
    #[error("Document has no extractable text: {0}")]
    Empty(String),
}

impl ExtractionFailure {
    fn from_parser(source_name: &str, err: ParserError) -> Self {
        match err {
            ParserError::UnsupportedFormat(format) => Self::UnsupportedFormat(format),
            other => Self::Corrupt {
                source_name: source_name.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Turns document references into plain text
pub struct TextExtractor {
    registry: ParserRegistry,
    fetcher: Arc<dyn DocumentFetcher>,
    search_dirs: Vec<PathBuf>,
}

impl TextExtractor {
    /// Create an extractor with the default parsers
    ///
    /// Relative paths are looked up in `search_dirs`, in order.
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            registry: ParserRegistry::with_defaults(),
            fetcher,
            search_dirs,
        }
    }

    /// Build from storage and fetch configuration
    pub fn from_config(
        storage: &StorageConfig,
        fetch: &FetchConfig,
    ) -> hrdash_core::Result<Self> {
        let fetcher = HttpFetcher::new(Duration::from_secs(fetch.timeout_secs))?;
        Ok(Self::new(Arc::new(fetcher), storage.search_dirs()))
    }

    /// Replace the parser registry
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Directories searched for relative paths
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Locate a local document
    ///
    /// Absolute paths are used as given; relative paths are tried against
    /// each search directory in order.
    pub fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }

        self.search_dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }

    /// Raw bytes of a document without parsing them
    pub async fn load_bytes(
        &self,
        reference: &DocumentReference,
    ) -> Result<Vec<u8>, ExtractionFailure> {
        self.load(reference).await.map(|(_, bytes)| bytes)
    }

    async fn load(
        &self,
        reference: &DocumentReference,
    ) -> Result<(String, Vec<u8>), ExtractionFailure> {
        Ok(match reference {
            DocumentReference::Bytes { name, data } => (
                name.clone().unwrap_or_else(|| "<memory>".to_string()),
                data.clone(),
            ),
            DocumentReference::Path(path) => {
                let resolved = self
                    .resolve_path(path)
                    .ok_or_else(|| ExtractionFailure::NotFound(path.display().to_string()))?;

                let bytes = tokio::fs::read(&resolved).await.map_err(|e| {
                    ExtractionFailure::NotFound(format!("{}: {e}", resolved.display()))
                })?;

                (resolved.display().to_string(), bytes)
            }
            DocumentReference::Remote(url) => {
                let scheme = reference.scheme().unwrap_or_default();
                if scheme != "http" && scheme != "https" {
                    return Err(ExtractionFailure::UnsupportedScheme(scheme));
                }

                debug!(url = %url, "Fetching remote document");
                let bytes =
                    self.fetcher
                        .fetch(url)
                        .await
                        .map_err(|e| ExtractionFailure::FetchFailed {
                            url: url.clone(),
                            reason: e.to_string(),
                        })?;

                (url_path(url).to_string(), bytes)
            }
        })
    }

    /// Extract text, reporting the reason on failure
    pub async fn try_extract(
        &self,
        reference: &DocumentReference,
    ) -> Result<String, ExtractionFailure> {
        let (source_name, bytes) = self.load(reference).await?;

        let document = self
            .registry
            .parse_bytes(&source_name, &bytes)
            .map_err(|e| ExtractionFailure::from_parser(&source_name, e))?;

        if document.is_blank() {
            return Err(ExtractionFailure::Empty(source_name));
        }

        Ok(document.text())
    }

    /// Extract text, or an empty string when the document yields nothing
    pub async fn extract_text(&self, reference: &DocumentReference) -> String {
        match self.try_extract(reference).await {
            Ok(text) => text,
            Err(e) => {
                warn!(reference = %reference, error = %e, "Text extraction failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hrdash_core::HrError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher serving a fixed body, or failing when none is set
    struct StubFetcher {
        body: Option<Vec<u8>>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn serving(body: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                body: Some(body.to_vec()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DocumentFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> hrdash_core::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .clone()
                .ok_or_else(|| HrError::FetchError(format!("{url} returned 404")))
        }
    }

    fn extractor(fetcher: Arc<StubFetcher>, dirs: Vec<PathBuf>) -> TextExtractor {
        TextExtractor::new(fetcher, dirs)
    }

    #[tokio::test]
    async fn test_local_file_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cv.txt"), "Python developer in Riyadh").unwrap();

        let extractor = extractor(StubFetcher::failing(), vec![dir.path().to_path_buf()]);
        let text = extractor
            .extract_text(&DocumentReference::parse("cv.txt").unwrap())
            .await;

        assert_eq!(text, "Python developer in Riyadh\n");
    }

    #[tokio::test]
    async fn test_fallback_dir_is_searched_second() {
        let data = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();
        std::fs::write(fallback.path().join("cv.txt"), "from fallback").unwrap();

        let extractor = extractor(
            StubFetcher::failing(),
            vec![data.path().to_path_buf(), fallback.path().to_path_buf()],
        );

        let resolved = extractor.resolve_path(Path::new("cv.txt")).unwrap();
        assert_eq!(resolved, fallback.path().join("cv.txt"));

        std::fs::write(data.path().join("cv.txt"), "from data dir").unwrap();
        let resolved = extractor.resolve_path(Path::new("cv.txt")).unwrap();
        assert_eq!(resolved, data.path().join("cv.txt"));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = extractor(StubFetcher::failing(), vec![dir.path().to_path_buf()]);
        let reference = DocumentReference::parse("nope.pdf").unwrap();

        let err = extractor.try_extract(&reference).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::NotFound(_)));
        assert_eq!(extractor.extract_text(&reference).await, "");
    }

    #[tokio::test]
    async fn test_remote_document_is_fetched() {
        let fetcher = StubFetcher::serving(b"Figma prototypes and wireframes");
        let extractor = extractor(fetcher.clone(), Vec::new());

        let reference = DocumentReference::parse("https://files.test/resume?id=4").unwrap();
        let text = extractor.extract_text(&reference).await;

        assert_eq!(text, "Figma prototypes and wireframes\n");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_is_reported() {
        let extractor = extractor(StubFetcher::failing(), Vec::new());
        let reference = DocumentReference::parse("https://files.test/cv.pdf").unwrap();

        let err = extractor.try_extract(&reference).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::FetchFailed { .. }));
        assert_eq!(extractor.extract_text(&reference).await, "");
    }

    #[tokio::test]
    async fn test_load_bytes_skips_parsing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cv.pdf"), b"%PDF-1.4 not parsed").unwrap();
        let extractor = extractor(StubFetcher::serving(b"remote bytes"), vec![dir.path().to_path_buf()]);

        let local = extractor
            .load_bytes(&DocumentReference::parse("cv.pdf").unwrap())
            .await
            .unwrap();
        assert_eq!(local, b"%PDF-1.4 not parsed");

        let remote = extractor
            .load_bytes(&DocumentReference::parse("https://files.test/cv.pdf").unwrap())
            .await
            .unwrap();
        assert_eq!(remote, b"remote bytes");

        let missing = extractor
            .load_bytes(&DocumentReference::parse("gone.pdf").unwrap())
            .await;
        assert!(matches!(missing, Err(ExtractionFailure::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_not_fetched() {
        let fetcher = StubFetcher::serving(b"unused");
        let extractor = extractor(fetcher.clone(), Vec::new());
        let reference = DocumentReference::parse("ftp://files.test/cv.pdf").unwrap();

        let err = extractor.try_extract(&reference).await.unwrap_err();
        assert_eq!(err, ExtractionFailure::UnsupportedScheme("ftp".to_string()));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_pdf() {
        let extractor = extractor(StubFetcher::failing(), Vec::new());
        let reference = DocumentReference::named_bytes("cv.pdf", b"%PDF-1.4 garbage".to_vec());

        let err = extractor.try_extract(&reference).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_broken_pdf_degrades_to_empty_text() {
        let extractor = extractor(StubFetcher::failing(), Vec::new());
        let broken = DocumentReference::named_bytes("cv.pdf", crate::pdf::tests::pdf_with_missing_font());
        let fine = DocumentReference::named_bytes("next.txt", b"Python developer".to_vec());

        let err = extractor.try_extract(&broken).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::Corrupt { .. }));
        assert_eq!(extractor.extract_text(&broken).await, "");
        assert_eq!(extractor.extract_text(&fine).await, "Python developer\n");
    }

    #[tokio::test]
    async fn test_unknown_binary_is_unsupported() {
        let extractor = extractor(StubFetcher::failing(), Vec::new());
        let reference = DocumentReference::from_bytes(vec![0xff, 0xfe, 0x00, 0x01]);

        let err = extractor.try_extract(&reference).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_whitespace_only_document_is_empty() {
        let extractor = extractor(StubFetcher::failing(), Vec::new());
        let reference = DocumentReference::named_bytes("blank.txt", b"  \n\t ".to_vec());

        let err = extractor.try_extract(&reference).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::Empty(_)));
        assert_eq!(extractor.extract_text(&reference).await, "");
    }

    #[tokio::test]
    async fn test_docx_bytes() {
        let extractor = extractor(StubFetcher::failing(), Vec::new());
        let bytes = crate::docx::tests::docx_bytes(&["UX Designer Intern", "Figma"]);
        let reference = DocumentReference::from_bytes(bytes);

        let text = extractor.extract_text(&reference).await;
        assert!(text.starts_with("UX Designer Intern\nFigma\n"));
    }
}
