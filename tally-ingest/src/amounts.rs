//! Amount disambiguation: decide which decimal tokens on a line are money out, money in or
//! the running balance.
//!
//! This is a best-effort heuristic, not a parser. Statement text does not label its numbers,
//! so a fixed rule order decides every line:
//!
//! 1. Tokens carrying the overdrawn marker can only be a balance and become a negative balance.
//! 2. Two or more remaining tokens: debit-first institutions read `out, in[, .., balance]`;
//!    amount-then-balance institutions read `amount[, .., balance]`.
//! 3. Exactly one token: debit keywords, then credit keywords, then the institution default.
//!    Keywords are looked for on the line itself first, then in the record's earlier text.
//! 4. A lone token may additionally report the balance (see [`TrailingBalance`]).
//!
//! Lines that fit none of this are not second-guessed; the record keeps whatever was assigned.

use regex::Regex;
use tracing::debug;

use crate::profile::{AmountRules, Direction, PairConvention, TrailingBalance};
use crate::types::RawTransactionRecord;

/// One decimal-looking token found on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountToken {
    /// Digits and decimal point, thousands separators removed
    pub value: String,
    /// Suffixed with the institution's overdrawn marker
    pub overdrawn: bool,
}

impl AmountToken {
    /// Raw string stored in the record; overdrawn values get a leading `-`.
    pub fn signed(&self) -> String {
        if self.overdrawn {
            format!("-{}", self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Tokens of one line plus the text left once they are removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAmounts {
    pub tokens: Vec<AmountToken>,
    /// Line text with amounts cut out and whitespace collapsed
    pub text: String,
    /// The last non-space content of the line is an amount
    pub ends_with_amount: bool,
}

/// Split a line into amount tokens and remaining description text.
pub fn scan_line(line: &str, amount_token: &Regex) -> LineAmounts {
    let mut tokens = Vec::new();
    let mut text = String::with_capacity(line.len());
    let mut last = 0;
    let mut last_end = 0;

    for caps in amount_token.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(amount) = caps.name("amount") else { continue };
        text.push_str(&line[last..whole.start()]);
        text.push(' ');
        last = whole.end();
        last_end = whole.end();
        tokens.push(AmountToken {
            value: amount.as_str().replace(',', ""),
            overdrawn: caps.name("od").is_some(),
        });
    }
    text.push_str(&line[last..]);

    let ends_with_amount = !tokens.is_empty() && line[last_end..].trim().is_empty();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    LineAmounts {
        tokens,
        text,
        ends_with_amount,
    }
}

/// Clean a structured-table amount cell: `1,599.81` -> `1599.81`, `519.82 OD` -> `-519.82`.
pub fn clean_amount_cell(cell: &str, overdrawn_marker: Option<&str>) -> String {
    let mut s = cell.trim().to_string();
    let mut overdrawn = false;
    if let Some(marker) = overdrawn_marker {
        let upper = s.to_ascii_uppercase();
        if !marker.is_empty() && upper.ends_with(&marker.to_ascii_uppercase()) {
            s.truncate(s.len() - marker.len());
            overdrawn = true;
        }
    }
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '£' | '$' | '€') && !c.is_whitespace())
        .collect();
    if overdrawn && !cleaned.is_empty() {
        format!("-{cleaned}")
    } else {
        cleaned
    }
}

/// Field values decided for one line; `None` leaves the record's field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pub money_out: Option<String>,
    pub money_in: Option<String>,
    pub balance: Option<String>,
}

impl Assignment {
    pub fn is_empty(&self) -> bool {
        self.money_out.is_none() && self.money_in.is_none() && self.balance.is_none()
    }

    /// Merge into the open record: fields set here overwrite, unset fields keep earlier lines' values.
    pub fn apply(self, record: &mut RawTransactionRecord) {
        if let Some(v) = self.money_out {
            record.money_out = v;
        }
        if let Some(v) = self.money_in {
            record.money_in = v;
        }
        if let Some(v) = self.balance {
            record.balance = v;
        }
    }
}

pub struct Disambiguator<'a> {
    rules: &'a AmountRules,
}

impl<'a> Disambiguator<'a> {
    pub fn new(rules: &'a AmountRules) -> Self {
        Self { rules }
    }

    /// Assign the line's tokens given the open `record`, which holds the earlier lines'
    /// description and whether a balance was already supplied.
    pub fn assign(&self, line: &LineAmounts, record: &RawTransactionRecord) -> Assignment {
        let mut out = Assignment::default();
        let balance_set = record.has_balance();

        let (overdrawn, plain): (Vec<&AmountToken>, Vec<&AmountToken>) =
            line.tokens.iter().partition(|t| t.overdrawn);
        if let Some(od) = overdrawn.last() {
            out.balance = Some(od.signed());
        }

        match plain.as_slice() {
            [] => {}
            [only] => {
                let value = only.signed();
                match self.single_direction(&line.text, &record.description) {
                    Direction::Out => out.money_out = Some(value.clone()),
                    Direction::In => out.money_in = Some(value.clone()),
                }
                let trailing = self.rules.trailing_balance == TrailingBalance::SingleTokenAtLineEnd
                    && line.ends_with_amount
                    && !balance_set
                    && out.balance.is_none();
                if trailing {
                    out.balance = Some(value);
                }
            }
            [first, rest @ ..] => {
                let last = rest[rest.len() - 1];
                match self.rules.pair {
                    PairConvention::DebitFirst => {
                        out.money_out = Some(first.signed());
                        out.money_in = Some(rest[0].signed());
                        if rest.len() >= 2 {
                            out.balance = Some(last.signed());
                        } else if self.rules.trailing_balance == TrailingBalance::LastOfPair {
                            out.balance = Some(last.signed());
                        }
                    }
                    PairConvention::AmountThenBalance => {
                        match self.single_direction(&line.text, &record.description) {
                            Direction::Out => out.money_out = Some(first.signed()),
                            Direction::In => out.money_in = Some(first.signed()),
                        }
                        out.balance = Some(last.signed());
                    }
                }
            }
        }

        if !out.is_empty() {
            debug!(tokens = line.tokens.len(), ?out, "assigned amounts");
        }
        out
    }

    fn single_direction(&self, line: &str, earlier: &str) -> Direction {
        self.keyword_direction(line)
            .or_else(|| self.keyword_direction(earlier))
            .unwrap_or(self.rules.default_direction)
    }

    fn keyword_direction(&self, text: &str) -> Option<Direction> {
        let hit = |re: &Option<Regex>| re.as_ref().is_some_and(|re| re.is_match(text));
        if hit(&self.rules.debit_keywords) {
            Some(Direction::Out)
        } else if hit(&self.rules.credit_keywords) {
            Some(Direction::In)
        } else {
            None
        }
    }
}
