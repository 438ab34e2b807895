//! Line segmentation: turn one page of statement text into raw transaction records.
//!
//! Free-text layouts run a two-state machine. A date-anchor line emits the open record (if
//! any) and opens a new one; other lines continue the open record or are discarded when none
//! is open. Boilerplate filters only apply to lines without a date anchor, so a transaction
//! naming the bank is never lost. The record still open at end of page is always emitted. Table layouts read each
//! delimited row as a finished record.

use tracing::debug;

use crate::amounts::{Disambiguator, clean_amount_cell, scan_line};
use crate::profile::{Column, FormatProfile, Layout, TableLayout};
use crate::types::RawTransactionRecord;

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    NoOpenRecord,
    RecordOpen(RawTransactionRecord),
}

impl ScanState {
    /// Open `record`, handing back the record it replaces.
    fn open(&mut self, record: RawTransactionRecord) -> Option<RawTransactionRecord> {
        match std::mem::replace(self, ScanState::RecordOpen(record)) {
            ScanState::RecordOpen(done) => Some(done),
            ScanState::NoOpenRecord => None,
        }
    }

    fn current(&mut self) -> Option<&mut RawTransactionRecord> {
        match self {
            ScanState::RecordOpen(record) => Some(record),
            ScanState::NoOpenRecord => None,
        }
    }

    /// Close the open record without opening another.
    fn close(&mut self) -> Option<RawTransactionRecord> {
        std::mem::take(self).finish()
    }

    fn finish(self) -> Option<RawTransactionRecord> {
        match self {
            ScanState::RecordOpen(record) => Some(record),
            ScanState::NoOpenRecord => None,
        }
    }
}

pub struct Segmenter<'p> {
    profile: &'p FormatProfile,
}

impl<'p> Segmenter<'p> {
    pub fn new(profile: &'p FormatProfile) -> Self {
        Self { profile }
    }

    /// Records of one page, in line order.
    pub fn segment_page(&self, text: &str) -> Vec<RawTransactionRecord> {
        match &self.profile.layout {
            Layout::Table(table) if has_table_rows(text, table) => self.segment_table(text, table),
            _ => self.segment_lines(text),
        }
    }

    /// Records of every page, pages in order. Records never span pages.
    pub fn segment_pages<'t>(&self, pages: impl IntoIterator<Item = &'t str>) -> Vec<RawTransactionRecord> {
        pages
            .into_iter()
            .flat_map(|page| self.segment_page(page))
            .collect()
    }

    fn segment_lines(&self, text: &str) -> Vec<RawTransactionRecord> {
        let mut out = Vec::new();
        let mut state = ScanState::default();

        for line in text.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.profile.date_anchor.captures(line) {
                let (Some(whole), Some(date)) = (caps.get(0), caps.name("date")) else {
                    continue;
                };
                let content = line[whole.end()..].trim_start();
                if self.profile.is_carry_line(content) {
                    debug!(line, "skipped balance carry line");
                    out.extend(state.close());
                    continue;
                }
                let mut record = RawTransactionRecord::new(date.as_str());
                self.absorb(&mut record, content);
                debug!(date = %record.date, "opened record");
                if let Some(done) = state.open(record) {
                    out.push(done);
                }
            } else if self.profile.is_boilerplate(line) {
                continue;
            } else if let Some(record) = state.current() {
                let rest = self.profile.date_prefix.replace(line, "");
                self.absorb(record, &rest);
            }
        }

        if let Some(last) = state.finish() {
            out.push(last);
        }
        out
    }

    /// Feed one line's content into the open record.
    fn absorb(&self, record: &mut RawTransactionRecord, content: &str) {
        let scanned = scan_line(content, &self.profile.amount_token);
        let assignment = Disambiguator::new(&self.profile.amounts).assign(&scanned, record);
        assignment.apply(record);
        record.push_description(&scanned.text);
    }

    fn segment_table(&self, text: &str, table: &TableLayout) -> Vec<RawTransactionRecord> {
        text.lines()
            .filter_map(|line| self.table_row(line.trim(), table))
            .collect()
    }

    /// A data row, or `None` for header, separator and footer rows.
    fn table_row(&self, line: &str, table: &TableLayout) -> Option<RawTransactionRecord> {
        let cells = split_cells(line, table)?;
        let date_cell = cells.get(table.position(Column::Date)?)?;
        let caps = self.profile.date_anchor.captures(date_cell)?;
        let mut record = RawTransactionRecord::new(caps.name("date")?.as_str());
        let marker = self.profile.overdrawn_marker;

        for (column, cell) in table.columns.iter().zip(&cells) {
            let cell = collapse_whitespace(&cell.replace(table.cell_break, " "));
            match column {
                Column::Date | Column::Ignore => {}
                Column::PaymentType => {
                    record.payment_type = (!cell.is_empty()).then_some(cell);
                }
                Column::Description => record.push_description(&cell),
                Column::MoneyOut => record.money_out = clean_amount_cell(&cell, marker),
                Column::MoneyIn => record.money_in = clean_amount_cell(&cell, marker),
                Column::Balance => record.balance = clean_amount_cell(&cell, marker),
            }
        }
        Some(record)
    }
}

fn split_cells(line: &str, table: &TableLayout) -> Option<Vec<String>> {
    if !line.contains(table.separator) {
        return None;
    }
    let inner = line.trim();
    let inner = inner.strip_prefix(table.separator).unwrap_or(inner);
    let inner = inner.strip_suffix(table.separator).unwrap_or(inner);
    let cells: Vec<String> = inner
        .split(table.separator)
        .map(|c| c.trim().to_string())
        .collect();
    (cells.len() >= table.columns.len()).then_some(cells)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_table_rows(text: &str, table: &TableLayout) -> bool {
    text.lines().any(|line| split_cells(line.trim(), table).is_some())
}
