//! DOCX document parser using docx-rs
//!
//! Extracts paragraph text (including text inside tables) from Microsoft
//! Word documents, one paragraph per line.

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

use crate::{DocumentParser, FileType, ParsedDocument, ParserError, Result};

/// DOCX document parser
pub struct DocxParser {
    /// Whether table cell text is included
    pub include_tables: bool,
}

impl DocxParser {
    /// Create a new DOCX parser with default settings
    pub fn new() -> Self {
        Self {
            include_tables: true,
        }
    }

    /// Toggle table text extraction
    pub fn with_tables(mut self, enabled: bool) -> Self {
        self.include_tables = enabled;
        self
    }
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

impl DocumentParser for DocxParser {
    fn parse_bytes(&self, source: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        let docx = read_docx(bytes).map_err(|e| ParserError::DocxError(format!("{source}: {e}")))?;

        let mut content = String::new();

        for child in docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => {
                    content.push_str(&paragraph_text(&para));
                    content.push('\n');
                }
                DocumentChild::Table(tbl) if self.include_tables => {
                    for row in &tbl.rows {
                        let docx_rs::TableChild::TableRow(tr) = row;
                        for cell in &tr.cells {
                            let docx_rs::TableRowChild::TableCell(tc) = cell;
                            for cell_child in &tc.children {
                                if let docx_rs::TableCellContent::Paragraph(para) = cell_child {
                                    content.push_str(&paragraph_text(para));
                                    content.push('\n');
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(ParsedDocument::new(source, FileType::Docx).with_pages(vec![content]))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Docx]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rs::{Docx, Run};
    use std::io::Cursor;

    /// Build an in-memory DOCX with one paragraph per entry
    pub(crate) fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }

        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_docx_paragraphs() {
        let bytes = docx_bytes(&["Senior Software Engineer", "", "Build the platform"]);
        let doc = DocxParser::new().parse_bytes("jobs.docx", &bytes).unwrap();

        assert_eq!(doc.file_type, FileType::Docx);
        assert_eq!(
            doc.paragraphs(),
            vec!["Senior Software Engineer", "Build the platform"]
        );
    }

    #[test]
    fn test_invalid_docx() {
        let err = DocxParser::new()
            .parse_bytes("broken.docx", b"PK\x03\x04 not a zip")
            .unwrap_err();
        assert!(matches!(err, ParserError::DocxError(_)));
    }

    #[test]
    fn test_supported_types() {
        let parser = DocxParser::new().with_tables(false);
        assert!(!parser.include_tables);
        assert!(parser.can_parse(FileType::Docx));
        assert!(!parser.can_parse(FileType::Pdf));
    }
}
