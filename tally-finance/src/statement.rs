//! Per-document driver: identify -> resolve page text -> segment -> normalize.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::CanonicalTransaction;
use tally_ingest::{
    Document, InstitutionId, PageSource, PageText, ProfileRegistry, Segmenter, TextResolver, identify,
    open_document,
};
use tracing::{debug, info, info_span, warn};

use crate::normalize::Normalizer;

/// What happened to one document
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatementReport {
    pub name: String,
    pub institution: Option<InstitutionId>,
    pub pages: usize,
    pub pages_empty: usize,
    pub pages_ocr: usize,
    pub raw_records: usize,
    pub transactions: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StatementOutcome {
    pub report: StatementReport,
    pub transactions: Vec<CanonicalTransaction>,
}

pub struct StatementProcessor {
    registry: ProfileRegistry,
    resolver: TextResolver,
    default_year: Option<i32>,
}

impl StatementProcessor {
    pub fn new(registry: ProfileRegistry, resolver: TextResolver) -> Self {
        Self {
            registry,
            resolver,
            default_year: None,
        }
    }

    pub fn with_default_year(mut self, year: Option<i32>) -> Self {
        self.default_year = year;
        self
    }

    /// Open and process a `.pdf` or `.txt` file.
    pub fn process_path(&self, path: &Path) -> Result<StatementOutcome> {
        let document = open_document(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(self.process(document.as_ref()))
    }

    /// Identify the document's institution, reading the first page only if the name is not enough.
    pub fn identify(&self, document: &dyn Document) -> Option<InstitutionId> {
        identify(&self.registry, document.name(), || self.first_page(document).text)
    }

    /// Never fails: unidentifiable documents and unreadable pages yield fewer (or zero) records.
    pub fn process(&self, document: &dyn Document) -> StatementOutcome {
        let span = info_span!("document", name = %document.name());
        let _enter = span.enter();

        let mut report = StatementReport {
            name: document.name().to_string(),
            pages: document.page_count(),
            ..StatementReport::default()
        };

        let mut first: Option<PageText> = None;
        let institution = identify(&self.registry, document.name(), || {
            let page = self.first_page(document);
            let text = page.text.clone();
            first = Some(page);
            text
        });
        let Some(profile) = institution.and_then(|id| self.registry.get(id)) else {
            warn!("no institution layout matches, skipping document");
            return StatementOutcome {
                report,
                transactions: Vec::new(),
            };
        };
        report.institution = Some(profile.institution);

        let segmenter = Segmenter::new(profile);
        let mut raw = Vec::new();
        for index in 0..document.page_count() {
            let page = match first.take() {
                Some(page) if index == 0 => page,
                _ => self.resolver.page_text(document, index),
            };
            match page.source {
                PageSource::Empty => report.pages_empty += 1,
                PageSource::Ocr => report.pages_ocr += 1,
                PageSource::Native => {}
            }
            raw.extend(segmenter.segment_page(&page.text));
        }
        report.raw_records = raw.len();

        let normalizer = Normalizer::new(profile, document.name(), self.default_year);
        debug!(year = normalizer.year(), "statement year");
        let normalized = normalizer.normalize(&raw);
        report.transactions = normalized.transactions.len();
        report.dropped = normalized.dropped;

        info!(
            institution = %profile.institution,
            pages = report.pages,
            pages_empty = report.pages_empty,
            pages_ocr = report.pages_ocr,
            raw_records = report.raw_records,
            transactions = report.transactions,
            dropped = report.dropped,
            "document processed"
        );

        StatementOutcome {
            report,
            transactions: normalized.transactions,
        }
    }

    fn first_page(&self, document: &dyn Document) -> PageText {
        if document.page_count() == 0 {
            return PageText {
                text: String::new(),
                source: PageSource::Empty,
            };
        }
        self.resolver.page_text(document, 0)
    }
}
