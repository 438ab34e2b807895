//! Statement documents as a sequence of pages with a native text layer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::TextSourceError;

/// Form feed, the page separator of `pdftotext`-style text dumps
const PAGE_BREAK: char = '\x0c';

pub trait Document: Send {
    /// File name used for identification and statement-period inference
    fn name(&self) -> &str;
    fn page_count(&self) -> usize;
    /// Native text of page `index` (0-based); may be empty for scanned pages.
    fn page_text(&self, index: usize) -> Result<String, TextSourceError>;
    /// File the page images can be rendered from, if any
    fn path(&self) -> Option<&Path>;
}

/// Open a `.pdf` or `.txt` statement.
pub fn open_document(path: &Path) -> Result<Box<dyn Document>, TextSourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => Ok(Box::new(PdfDocument::open(path)?)),
        Some("txt") => Ok(Box::new(TextDocument::open(path)?)),
        _ => Err(TextSourceError::Unsupported(path.display().to_string())),
    }
}

/// True for file names [`open_document`] accepts.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf") || e.eq_ignore_ascii_case("txt"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read(path: &Path) -> Result<Vec<u8>, TextSourceError> {
    fs::read(path).map_err(|source| TextSourceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn page(pages: &[String], index: usize) -> Result<String, TextSourceError> {
    pages
        .get(index)
        .cloned()
        .ok_or(TextSourceError::PageOutOfRange {
            index,
            count: pages.len(),
        })
}

/// PDF with its text layer extracted up front (`pdf-extract`)
pub struct PdfDocument {
    name: String,
    path: PathBuf,
    pages: Vec<String>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, TextSourceError> {
        let bytes = read(path)?;
        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map_err(|e| TextSourceError::Pdf(e.to_string()))?;
        debug!(pages = pages.len(), "extracted PDF text layer");
        Ok(Self {
            name: file_name(path),
            path: path.to_path_buf(),
            pages,
        })
    }
}

impl Document for PdfDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, TextSourceError> {
        page(&self.pages, index)
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Plain-text statement, pages separated by form feeds. Also the in-memory document used by tests.
pub struct TextDocument {
    name: String,
    path: Option<PathBuf>,
    pages: Vec<String>,
}

impl TextDocument {
    pub fn open(path: &Path) -> Result<Self, TextSourceError> {
        let bytes = read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self {
            name: file_name(path),
            path: None,
            pages: split_pages(&text),
        })
    }

    pub fn from_pages<S: Into<String>>(name: impl Into<String>, pages: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            path: None,
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a PDF the pages can be rasterized from.
    pub fn with_raster_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl Document for TextDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, TextSourceError> {
        page(&self.pages, index)
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}
