//! tally-ingest: turns statement documents into raw per-bank transaction records.
//!
//! Identification, page text resolution (with OCR fallback), format profiles, line
//! segmentation and amount disambiguation live here; normalization is in `tally-finance`.

pub mod amounts;
pub mod banks;
pub mod identify;
pub mod profile;
pub mod segment;
pub mod source;
pub mod types;

pub use banks::ProfileRegistry;
pub use identify::identify;
pub use profile::FormatProfile;
pub use segment::Segmenter;
pub use source::{
    Document, Ocr, OcrSettings, PageSource, PageText, TesseractOcr, TextDocument, TextResolver,
    TextSourceError, open_document,
};
pub use types::{InstitutionId, RawTransactionRecord};
