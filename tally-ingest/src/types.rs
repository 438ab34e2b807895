use serde::{Deserialize, Serialize};
use std::fmt;

/// Institutions with a built-in format profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstitutionId {
    Barclays,
    VirginMoney,
    Nationwide,
    Tsb,
}

impl InstitutionId {
    /// Display name, also written to the `Bank Name` column
    pub fn name(&self) -> &'static str {
        match self {
            InstitutionId::Barclays => "Barclays",
            InstitutionId::VirginMoney => "Virgin Money",
            InstitutionId::Nationwide => "Nationwide",
            InstitutionId::Tsb => "TSB",
        }
    }
}

impl fmt::Display for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-bank record as assembled by the segmenter, before normalization.
///
/// Amount fields hold raw numeric strings (thousands separators removed, overdrawn balances
/// already rewritten with a leading `-`); an empty string means "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionRecord {
    pub date: String,
    pub description: String,
    pub money_in: String,
    pub money_out: String,
    pub balance: String,
    /// Institution-specific category label (TSB "Payment type" column)
    pub payment_type: Option<String>,
}

impl RawTransactionRecord {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Space-join a description fragment onto what has been collected so far.
    pub fn push_description(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(fragment);
    }

    pub fn has_balance(&self) -> bool {
        !self.balance.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_description_space_joins() {
        let mut r = RawTransactionRecord::new("04 Mar");
        r.push_description("  LEMONADE FINANCE ");
        r.push_description("");
        r.push_description("CD 3947");
        assert_eq!(r.description, "LEMONADE FINANCE CD 3947");
    }
}
