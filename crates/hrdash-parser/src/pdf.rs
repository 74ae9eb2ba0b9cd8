//! PDF document parser using pdf-extract
//!
//! Extracts the text layer of PDF resumes page by page. Scanned PDFs without
//! a text layer parse successfully but produce blank pages.
//!
//! pdf-extract panics on some structurally valid but broken files (a font
//! reference to a missing object, for one). Those panics are caught here and
//! reported as `ParserError::PdfError` like any other corrupt PDF.

use std::panic::{self, AssertUnwindSafe};

use crate::{DocumentParser, FileType, ParsedDocument, ParserError, Result};

/// Page separator emitted by pdf-extract
const PAGE_BREAK: char = '\x0C';

/// PDF document parser
pub struct PdfParser;

impl PdfParser {
    /// Create a new PDF parser
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split extracted text into pages on form feeds
///
/// A trailing form feed closes the last page rather than opening an empty one.
fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();

    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }

    pages
}

fn panic_message<'a>(payload: &'a (dyn std::any::Any + Send + 'static)) -> &'a str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl DocumentParser for PdfParser {
    fn parse_bytes(&self, source: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        let text = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }))
        .map_err(|payload| {
            ParserError::PdfError(format!("{source}: parser panicked: {}", panic_message(&*payload)))
        })?
        .map_err(|e| ParserError::PdfError(format!("{source}: {e}")))?;

        Ok(ParsedDocument::new(source, FileType::Pdf).with_pages(split_pages(&text)))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Pdf]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// One-page PDF whose only font points at an object that does not exist
    pub(crate) fn pdf_with_missing_font() -> Vec<u8> {
        let content = "BT /F1 12 Tf 72 712 Td (Senior Python engineer) Tj ET";
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 99 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    #[test]
    fn test_missing_font_object_is_a_pdf_error() {
        let parser = PdfParser::new();
        let err = parser
            .parse_bytes("cv.pdf", &pdf_with_missing_font())
            .unwrap_err();
        assert!(matches!(err, ParserError::PdfError(_)));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("bad font");
        assert_eq!(panic_message(&*payload), "bad font");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("no object"));
        assert_eq!(panic_message(&*payload), "no object");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*payload), "unknown panic");
    }

    #[test]
    fn test_split_pages() {
        assert_eq!(split_pages("one\x0Ctwo"), vec!["one", "two"]);
        assert_eq!(split_pages("one\x0Ctwo\x0C"), vec!["one", "two"]);
        assert_eq!(split_pages("single"), vec!["single"]);
        assert_eq!(split_pages(""), vec![""]);
    }

    #[test]
    fn test_garbage_is_a_pdf_error() {
        let parser = PdfParser::new();
        let err = parser
            .parse_bytes("broken.pdf", b"%PDF-1.4 this is not really a pdf")
            .unwrap_err();
        assert!(matches!(err, ParserError::PdfError(_)));
    }

    #[test]
    fn test_supported_types() {
        let parser = PdfParser::new();
        assert!(parser.can_parse(FileType::Pdf));
        assert!(!parser.can_parse(FileType::Docx));
    }
}
