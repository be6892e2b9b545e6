use thiserror::Error;

use parser::backend::{LopdfBackend, PdfBackend};

pub mod parser;
pub mod text;
pub mod types;

pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Page not found: {0}")]
    PageNotFound(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A parsed PDF document.
///
/// Constructed via [`ParsedDocument::from_bytes`]. Provides the two
/// capabilities the title extractor consumes -- the optional metadata title
/// and the plain text of a page -- without re-parsing from bytes. Owned per
/// file; dropping it releases the parsed structure.
pub struct ParsedDocument {
    backend: LopdfBackend,
}

impl ParsedDocument {
    /// Parse PDF bytes into a document handle.
    ///
    /// Malformed or encrypted input yields a [`PdfError`]; this never
    /// panics on arbitrary bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        Ok(ParsedDocument { backend })
    }

    /// Document metadata from the trailer's Info dictionary.
    pub fn metadata(&self) -> DocumentMetadata {
        let raw = self.backend.metadata();
        DocumentMetadata {
            title: raw.get("Title").cloned(),
            author: raw.get("Author").cloned(),
            creator: raw.get("Creator").cloned(),
            page_count: self.backend.page_count(),
        }
    }

    /// Total number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Plain text of the page at `index` (0-based) as trimmed, non-empty
    /// lines in reading order.
    pub fn page_lines(&self, index: usize) -> Result<Vec<String>, PdfError> {
        let pages = self.backend.pages();
        let page_number = (index as u32).saturating_add(1);
        let page_id = pages
            .get(&page_number)
            .copied()
            .ok_or(PdfError::PageNotFound(index))?;
        parser::layout::extract_page_lines(&self.backend, page_id)
    }

    /// Plain text of the page at `index` (0-based), lines joined with `\n`.
    pub fn page_text(&self, index: usize) -> Result<String, PdfError> {
        Ok(self.page_lines(index)?.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions (stateless, re-parse each call)
// ---------------------------------------------------------------------------

/// Get document metadata without keeping the handle around.
pub fn info(bytes: &[u8]) -> Result<DocumentMetadata, PdfError> {
    Ok(ParsedDocument::from_bytes(bytes)?.metadata())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    use super::*;

    /// Build a one-page PDF in memory, with an optional Info Title and the
    /// given page-one lines laid out top-down.
    fn build_pdf(meta_title: Option<&str>, lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-20).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = meta_title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialize pdf");
        buf
    }

    #[test]
    fn empty_bytes_fail_to_parse() {
        assert!(matches!(
            ParsedDocument::from_bytes(&[]),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let bytes = b"%PDF-1.5 this is not a real pdf";
        assert!(ParsedDocument::from_bytes(bytes).is_err());
    }

    #[test]
    fn metadata_title_round_trips() {
        let bytes = build_pdf(Some("Attention Is All You Need"), &["body text"]);
        let doc = ParsedDocument::from_bytes(&bytes).unwrap();
        let meta = doc.metadata();
        assert_eq!(meta.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(meta.page_count, 1);
    }

    #[test]
    fn missing_info_dictionary_means_no_title() {
        let bytes = build_pdf(None, &["body text of the first page"]);
        let meta = info(&bytes).unwrap();
        assert_eq!(meta.title, None);
    }

    #[test]
    fn page_lines_preserve_top_down_order() {
        let bytes = build_pdf(
            None,
            &["A Title On Top", "an author line", "an abstract line"],
        );
        let doc = ParsedDocument::from_bytes(&bytes).unwrap();
        let lines = doc.page_lines(0).unwrap();
        assert_eq!(
            lines,
            vec!["A Title On Top", "an author line", "an abstract line"]
        );
    }

    #[test]
    fn page_text_joins_lines() {
        let bytes = build_pdf(None, &["first", "second"]);
        let doc = ParsedDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.page_text(0).unwrap(), "first\nsecond");
    }

    #[test]
    fn out_of_range_page_is_reported() {
        let bytes = build_pdf(None, &["only one page"]);
        let doc = ParsedDocument::from_bytes(&bytes).unwrap();
        assert!(matches!(doc.page_lines(5), Err(PdfError::PageNotFound(5))));
    }
}
