//! Cross-document merge: one ordered, deduplicated ledger from every statement processed.

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::transaction::CanonicalTransaction;

/// Ordered (ascending date), deduplicated transactions across all documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<CanonicalTransaction>,
}

/// Merge normalized records from all documents into one ledger.
///
/// Records are stably sorted by date, so same-date entries keep their per-document, per-line
/// order, then exact duplicates on the uniqueness tuple are removed keeping the first
/// occurrence. Must run once over the full set so duplicates across documents are caught.
pub fn merge(records: impl IntoIterator<Item = CanonicalTransaction>) -> Ledger {
    let mut all: Vec<CanonicalTransaction> = records.into_iter().collect();
    all.sort_by_key(|t| t.date);

    let mut seen = HashSet::new();
    all.retain(|t| seen.insert(t.dedup_key()));

    Ledger { transactions: all }
}

impl Ledger {
    /// Merge per-document record lists, in document order.
    pub fn from_documents(documents: impl IntoIterator<Item = Vec<CanonicalTransaction>>) -> Self {
        merge(documents.into_iter().flatten())
    }

    pub fn transactions(&self) -> &[CanonicalTransaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalTransaction> {
        self.transactions.iter()
    }

    /// Total (money in, money out) over the ledger
    pub fn totals(&self) -> (Decimal, Decimal) {
        self.transactions
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(i, o), t| {
                (i + t.money_in, o + t.money_out)
            })
    }
}

impl IntoIterator for Ledger {
    type Item = CanonicalTransaction;
    type IntoIter = std::vec::IntoIter<CanonicalTransaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn txn(day: u32, desc: &str, money_out: Decimal) -> CanonicalTransaction {
        CanonicalTransaction {
            date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            transaction_type: TransactionType::Payment,
            money_in: Decimal::ZERO,
            money_out,
            bank_name: "Nationwide".to_string(),
            statement_month: "Apr 2025".to_string(),
            description: desc.to_string(),
            balance: Decimal::ZERO,
        }
    }

    #[test]
    fn test_sorts_by_date_and_keeps_tie_order() {
        let ledger = merge(vec![
            txn(9, "late", dec!(1)),
            txn(2, "first on the 2nd", dec!(2)),
            txn(2, "second on the 2nd", dec!(3)),
            txn(1, "early", dec!(4)),
        ]);
        let descs: Vec<_> = ledger.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["early", "first on the 2nd", "second on the 2nd", "late"]);
    }

    #[test]
    fn test_duplicate_document_counted_once() {
        let doc = vec![txn(1, "Tesco", dec!(12.50)), txn(3, "Rent", dec!(800))];
        let ledger = Ledger::from_documents(vec![doc.clone(), doc.clone()]);
        assert_eq!(ledger.len(), doc.len());
    }

    #[test]
    fn test_keeps_first_occurrence_of_duplicate() {
        let mut a = txn(1, "Tesco", dec!(12.50));
        a.statement_month = "Mar 2025".to_string();
        let b = txn(1, "Tesco", dec!(12.5));
        let ledger = merge(vec![a.clone(), b]);
        assert_eq!(ledger.transactions(), &[a]);
    }

    #[test]
    fn test_same_day_same_amount_different_description_survive() {
        let ledger = merge(vec![txn(1, "Coffee", dec!(3)), txn(1, "Bus", dec!(3))]);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge(vec![
            txn(4, "b", dec!(1)),
            txn(1, "a", dec!(1)),
            txn(4, "b", dec!(1)),
        ]);
        let twice = merge(once.clone().into_iter().chain(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_totals() {
        let mut credit = txn(2, "Salary", Decimal::ZERO);
        credit.money_in = dec!(2000.00);
        let ledger = merge(vec![credit, txn(1, "Rent", dec!(800.00))]);
        assert_eq!(ledger.totals(), (dec!(2000.00), dec!(800.00)));
    }
}
