use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a document page into text. None of these abort a batch; the
/// resolver logs them and treats the page as empty.
#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported document type: {0}")]
    Unsupported(String),

    #[error("PDF text layer unreadable: {0}")]
    Pdf(String),

    #[error("page {index} out of range ({count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("{0} has no file to rasterize")]
    NoRaster(String),

    #[error("OCR tool not found: {tool}")]
    ToolMissing {
        tool: &'static str,
        #[source]
        source: which::Error,
    },

    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    #[error(transparent)]
    Io(#[from] io::Error),
}
