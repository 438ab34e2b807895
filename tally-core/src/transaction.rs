//! Canonical transaction schema shared by every institution.
//!
//! Field order and serde names are the column contract with the tabular writer:
//! `Date, Transaction Type, Money In, Money Out, Bank Name, Statement Month, Description, Balance`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified transaction tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "Received")]
    Received,
    #[serde(rename = "Payment")]
    Payment,
    #[serde(rename = "Credit")]
    Credit,
    #[serde(rename = "Debit")]
    Debit,
    #[serde(rename = "Fee")]
    Fee,
    #[serde(rename = "Transfer In")]
    TransferIn,
    #[serde(rename = "Transfer Out")]
    TransferOut,
    #[serde(rename = "Direct Debit")]
    DirectDebit,
    #[serde(rename = "Deposit")]
    Deposit,
    #[serde(rename = "Withdrawal")]
    Withdrawal,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl TransactionType {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Received => "Received",
            TransactionType::Payment => "Payment",
            TransactionType::Credit => "Credit",
            TransactionType::Debit => "Debit",
            TransactionType::Fee => "Fee",
            TransactionType::TransferIn => "Transfer In",
            TransactionType::TransferOut => "Transfer Out",
            TransactionType::DirectDebit => "Direct Debit",
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Unknown => "Unknown",
        }
    }

    /// Classification from direction alone, used when no label or keyword decides.
    pub fn from_direction(money_in: Decimal, money_out: Decimal) -> Self {
        if money_in > Decimal::ZERO {
            TransactionType::Received
        } else if money_out > Decimal::ZERO {
            TransactionType::Payment
        } else {
            TransactionType::Unknown
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The normalized output unit of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Transaction Type")]
    pub transaction_type: TransactionType,
    /// Always non-negative
    #[serde(rename = "Money In")]
    pub money_in: Decimal,
    /// Always non-negative
    #[serde(rename = "Money Out")]
    pub money_out: Decimal,
    #[serde(rename = "Bank Name")]
    pub bank_name: String,
    /// Display label such as `Apr 2025`, or `Unknown`
    #[serde(rename = "Statement Month")]
    pub statement_month: String,
    #[serde(rename = "Description")]
    pub description: String,
    /// Negative when the account was overdrawn
    #[serde(rename = "Balance")]
    pub balance: Decimal,
}

/// Uniqueness tuple of the ledger: (date, type, money in, money out, bank, description).
///
/// Amounts are normalized so `100.0` and `100.00` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    date: NaiveDate,
    transaction_type: TransactionType,
    money_in: Decimal,
    money_out: Decimal,
    bank_name: String,
    description: String,
}

impl CanonicalTransaction {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            date: self.date,
            transaction_type: self.transaction_type,
            money_in: self.money_in.normalize(),
            money_out: self.money_out.normalize(),
            bank_name: self.bank_name.clone(),
            description: self.description.clone(),
        }
    }

    /// True when exactly one of money in / money out is non-zero.
    pub fn has_direction(&self) -> bool {
        (self.money_in > Decimal::ZERO) != (self.money_out > Decimal::ZERO)
    }

    /// A row with no description, no balance and no amounts carries no information.
    pub fn is_noise(&self) -> bool {
        self.description.trim().is_empty()
            && self.balance.is_zero()
            && self.money_in.is_zero()
            && self.money_out.is_zero()
    }
}
