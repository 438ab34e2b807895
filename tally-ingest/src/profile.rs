//! Format profiles: immutable per-institution configuration consumed by the identifier,
//! segmenter, disambiguator and normalizer.
//!
//! Profiles are built once by [`crate::banks::ProfileRegistry::builtin`] and only read afterwards.

use regex::Regex;
use tally_core::TransactionType;

use crate::types::InstitutionId;

/// Which side of the ledger a single amount lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

/// How a line carrying two or more amounts is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairConvention {
    /// `money out, money in[, ..., balance]`
    DebitFirst,
    /// `amount[, ..., balance]`; the amount's direction comes from keywords
    AmountThenBalance,
}

/// When a line's amount also reports the running balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingBalance {
    Never,
    /// A lone amount sitting at the end of the line, while the record has no balance yet
    SingleTokenAtLineEnd,
    /// The second of exactly two amounts
    LastOfPair,
}

/// Amount disambiguation settings for one institution
#[derive(Debug, Clone)]
pub struct AmountRules {
    pub pair: PairConvention,
    /// Description terms that send a lone amount to money out
    pub debit_keywords: Option<Regex>,
    /// Description terms that send a lone amount to money in
    pub credit_keywords: Option<Regex>,
    /// Direction of a lone amount when no keyword matches
    pub default_direction: Direction,
    pub trailing_balance: TrailingBalance,
}

/// A column of a structured statement table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    PaymentType,
    Description,
    MoneyOut,
    MoneyIn,
    Balance,
    Ignore,
}

#[derive(Debug, Clone)]
pub struct TableLayout {
    pub separator: char,
    pub columns: Vec<Column>,
    /// In-cell line break marker, replaced by a space
    pub cell_break: &'static str,
}

impl TableLayout {
    pub fn position(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}

#[derive(Debug, Clone)]
pub enum Layout {
    /// Free text, one or more lines per transaction, opened by a date-anchor line
    FreeText,
    /// Delimited table rows, one row per transaction. Pages without table rows
    /// (typically OCR output) are read as free text.
    Table(TableLayout),
}

/// How a raw category label maps onto a transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelType {
    Fixed(TransactionType),
    ByDirection {
        money_in: TransactionType,
        money_out: TransactionType,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationRules {
    /// Upper-case raw label -> type
    pub labels: Vec<(&'static str, LabelType)>,
    /// Description substring -> type, first match wins, applied over the label/direction result
    pub descriptions: Vec<(&'static str, TransactionType)>,
}

/// Filler that is never transaction content
#[derive(Debug, Clone, Default)]
pub struct Boilerplate {
    /// Header, footer and notice lines starting with one of these
    pub prefixes: Vec<&'static str>,
    /// Whole-line patterns
    pub patterns: Vec<Regex>,
    /// Date-anchored balance carry lines, matched on the text after the date
    pub carry_lines: Vec<&'static str>,
}

impl Boilerplate {
    /// Only consulted for lines without a date anchor.
    pub fn matches(&self, line: &str) -> bool {
        self.prefixes.iter().any(|s| line.starts_with(s))
            || self.patterns.iter().any(|re| re.is_match(line))
    }

    pub fn is_carry_line(&self, content: &str) -> bool {
        self.carry_lines.iter().any(|s| content.starts_with(s))
    }
}

#[derive(Debug, Clone)]
pub struct FormatProfile {
    pub institution: InstitutionId,
    pub file_pattern: Regex,
    pub content_pattern: Regex,
    /// Transaction-start pattern; must expose the date token as the `date` group
    pub date_anchor: Regex,
    /// Short date prefix stripped from continuation lines
    pub date_prefix: Regex,
    /// chrono format of the `date` token; may omit the year
    pub date_format: &'static str,
    /// Decimal-looking tokens; `amount` group plus an optional `od` group for the overdrawn marker
    pub amount_token: Regex,
    pub overdrawn_marker: Option<&'static str>,
    pub layout: Layout,
    pub boilerplate: Boilerplate,
    pub amounts: AmountRules,
    pub classification: ClassificationRules,
}

impl FormatProfile {
    pub fn bank_name(&self) -> &'static str {
        self.institution.name()
    }

    /// True when `date_format` carries its own year (`%y` or `%Y`).
    pub fn date_has_year(&self) -> bool {
        self.date_format.contains("%y") || self.date_format.contains("%Y")
    }

    pub fn is_boilerplate(&self, line: &str) -> bool {
        self.boilerplate.matches(line)
    }

    pub fn is_carry_line(&self, content: &str) -> bool {
        self.boilerplate.is_carry_line(content)
    }
}
