//! Text source resolution: native text layer first, OCR when a page has none.

mod document;
mod error;
mod ocr;

pub use document::{Document, PdfDocument, TextDocument, is_supported, open_document};
pub use error::TextSourceError;
pub use ocr::{Ocr, OcrSettings, TesseractOcr};

use std::sync::Arc;

use tracing::{debug, warn};

/// Where a resolved page's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Native,
    Ocr,
    /// Neither source produced text
    Empty,
}

#[derive(Debug, Clone)]
pub struct PageText {
    pub text: String,
    pub source: PageSource,
}

impl PageText {
    fn empty() -> Self {
        Self {
            text: String::new(),
            source: PageSource::Empty,
        }
    }
}

#[derive(Clone, Default)]
pub struct TextResolver {
    ocr: Option<Arc<dyn Ocr>>,
}

impl TextResolver {
    /// Native text only; blank pages stay blank.
    pub fn native_only() -> Self {
        Self { ocr: None }
    }

    pub fn with_ocr(ocr: Arc<dyn Ocr>) -> Self {
        Self { ocr: Some(ocr) }
    }

    /// Text of page `index`. Never fails: an unreadable page resolves to empty text.
    pub fn page_text(&self, document: &dyn Document, index: usize) -> PageText {
        match document.page_text(index) {
            Ok(text) if !text.trim().is_empty() => {
                return PageText {
                    text,
                    source: PageSource::Native,
                };
            }
            Ok(_) => debug!(page = index + 1, "no native text"),
            Err(e) => warn!(page = index + 1, error = %e, "native text extraction failed"),
        }

        let Some(ocr) = &self.ocr else {
            return PageText::empty();
        };
        match ocr.recognize(document, index) {
            Ok(text) if !text.trim().is_empty() => PageText {
                text,
                source: PageSource::Ocr,
            },
            Ok(_) => {
                warn!(page = index + 1, "OCR produced no text");
                PageText::empty()
            }
            Err(e) => {
                warn!(page = index + 1, error = %e, "OCR failed");
                PageText::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    impl Ocr for FixedOcr {
        fn recognize(&self, _: &dyn Document, _: usize) -> Result<String, TextSourceError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenOcr;

    impl Ocr for BrokenOcr {
        fn recognize(&self, _: &dyn Document, _: usize) -> Result<String, TextSourceError> {
            Err(TextSourceError::Timeout {
                tool: "tesseract",
                secs: 1,
            })
        }
    }

    #[test]
    fn test_native_text_preferred() {
        let doc = TextDocument::from_pages("a.txt", ["01 Apr Card 1.00"]);
        let resolver = TextResolver::with_ocr(Arc::new(FixedOcr("ocr text")));
        let page = resolver.page_text(&doc, 0);
        assert_eq!(page.source, PageSource::Native);
        assert_eq!(page.text, "01 Apr Card 1.00");
    }

    #[test]
    fn test_blank_page_falls_back_to_ocr() {
        let doc = TextDocument::from_pages("a.txt", ["  \n "]);
        let resolver = TextResolver::with_ocr(Arc::new(FixedOcr("04 Mar 24 CASH DEPOSIT 5.00")));
        let page = resolver.page_text(&doc, 0);
        assert_eq!(page.source, PageSource::Ocr);
        assert!(page.text.starts_with("04 Mar 24"));
    }

    #[test]
    fn test_failures_resolve_to_empty_text() {
        let doc = TextDocument::from_pages("a.txt", [""]);
        let page = TextResolver::with_ocr(Arc::new(BrokenOcr)).page_text(&doc, 0);
        assert_eq!(page.source, PageSource::Empty);
        assert!(page.text.is_empty());

        let page = TextResolver::native_only().page_text(&doc, 7);
        assert_eq!(page.source, PageSource::Empty);
    }
}
