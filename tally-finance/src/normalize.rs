//! Raw per-bank records -> canonical transactions.

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use tally_core::{CanonicalTransaction, parse_amount};
use tally_ingest::{FormatProfile, RawTransactionRecord};
use tracing::debug;

use crate::period::{StatementPeriod, infer_period};
use crate::type_rules::classify;

pub const UNKNOWN_MONTH: &str = "Unknown";

/// Canonical records of one document plus the number of raw records that did not survive
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub transactions: Vec<CanonicalTransaction>,
    /// Unparseable dates and noise rows
    pub dropped: usize,
}

pub struct Normalizer<'p> {
    profile: &'p FormatProfile,
    period: StatementPeriod,
    year: i32,
}

impl<'p> Normalizer<'p> {
    /// `default_year` is used for year-less dates when the file name carries no year.
    pub fn new(profile: &'p FormatProfile, source_name: &str, default_year: Option<i32>) -> Self {
        let period = infer_period(source_name);
        let year = period
            .year
            .or(default_year)
            .unwrap_or_else(|| Local::now().year());
        Self {
            profile,
            period,
            year,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn normalize(&self, records: &[RawTransactionRecord]) -> Normalized {
        let dated: Vec<(NaiveDate, &RawTransactionRecord)> = records
            .iter()
            .filter_map(|r| match self.parse_date(&r.date) {
                Some(date) => Some((date, r)),
                None => {
                    debug!(date = %r.date, description = %r.description, "dropping record with unparseable date");
                    None
                }
            })
            .collect();

        let statement_month = self
            .period
            .month
            .clone()
            .or_else(|| dated.first().map(|(d, _)| d.format("%b %Y").to_string()))
            .unwrap_or_else(|| UNKNOWN_MONTH.to_string());

        let mut transactions = Vec::with_capacity(dated.len());
        for (date, raw) in dated {
            let txn = self.canonical(date, raw, &statement_month);
            if txn.is_noise() {
                debug!(date = %raw.date, "dropping empty row");
                continue;
            }
            if !txn.has_direction() {
                debug!(date = %date, description = %txn.description, "direction undetermined");
            }
            transactions.push(txn);
        }

        Normalized {
            dropped: records.len() - transactions.len(),
            transactions,
        }
    }

    fn canonical(&self, date: NaiveDate, raw: &RawTransactionRecord, statement_month: &str) -> CanonicalTransaction {
        let money_in = self.amount(&raw.money_in).abs();
        let money_out = self.amount(&raw.money_out).abs();
        let description = raw.description.trim().to_string();
        let transaction_type = classify(
            &self.profile.classification,
            raw.payment_type.as_deref(),
            &description,
            money_in,
            money_out,
        );
        CanonicalTransaction {
            date,
            transaction_type,
            money_in,
            money_out,
            bank_name: self.profile.bank_name().to_string(),
            statement_month: statement_month.to_string(),
            description,
            balance: self.amount(&raw.balance),
        }
    }

    fn amount(&self, raw: &str) -> Decimal {
        if raw.trim().is_empty() {
            return Decimal::ZERO;
        }
        parse_amount(raw, self.profile.overdrawn_marker).unwrap_or_else(|| {
            debug!(raw, "unparseable amount, using zero");
            Decimal::ZERO
        })
    }

    fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let token = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if token.is_empty() {
            return None;
        }
        if self.profile.date_has_year() {
            NaiveDate::parse_from_str(&token, self.profile.date_format).ok()
        } else {
            let with_year = format!("{token} {}", self.year);
            let format = format!("{} %Y", self.profile.date_format);
            NaiveDate::parse_from_str(&with_year, &format).ok()
        }
    }
}

/// Normalize one document's raw records.
pub fn normalize(
    profile: &FormatProfile,
    records: &[RawTransactionRecord],
    source_name: &str,
    default_year: Option<i32>,
) -> Normalized {
    Normalizer::new(profile, source_name, default_year).normalize(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::TransactionType;
    use tally_ingest::banks::{barclays, nationwide, tsb};

    fn raw(date: &str, description: &str, money_in: &str, money_out: &str, balance: &str) -> RawTransactionRecord {
        RawTransactionRecord {
            date: date.to_string(),
            description: description.to_string(),
            money_in: money_in.to_string(),
            money_out: money_out.to_string(),
            balance: balance.to_string(),
            payment_type: None,
        }
    }

    #[test]
    fn test_year_from_file_name() {
        let profile = nationwide::profile().unwrap();
        let out = normalize(
            &profile,
            &[raw("05 Apr", "Contactless Payment TESCO", "", "12.50", "987.50")],
            "Nationwide Apr 2025.pdf",
            Some(2019),
        );
        let txn = &out.transactions[0];
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2025, 4, 5).unwrap());
        assert_eq!(txn.statement_month, "Apr 2025");
        assert_eq!(txn.bank_name, "Nationwide");
        assert_eq!(txn.money_out, dec!(12.50));
        assert_eq!(txn.money_in, Decimal::ZERO);
        assert_eq!(txn.transaction_type, TransactionType::Payment);
    }

    #[test]
    fn test_configured_default_year() {
        let profile = barclays::profile().unwrap();
        let normalizer = Normalizer::new(&profile, "barclays.pdf", Some(2023));
        assert_eq!(normalizer.year(), 2023);
        let out = normalizer.normalize(&[raw("03 Apr", "Received From J Smith", "250.00", "", "1237.60")]);
        assert_eq!(out.transactions[0].date, NaiveDate::from_ymd_opt(2023, 4, 3).unwrap());
        // No month token in the name: taken from the first dated record
        assert_eq!(out.transactions[0].statement_month, "Apr 2023");
        assert_eq!(out.transactions[0].transaction_type, TransactionType::Received);
    }

    #[test]
    fn test_unparseable_date_dropped() {
        let profile = barclays::profile().unwrap();
        let out = normalize(
            &profile,
            &[raw("31 Feb", "Card payment", "", "4.00", ""), raw("", "orphan", "", "1.00", "")],
            "barclays_Feb_2024.pdf",
            None,
        );
        assert!(out.transactions.is_empty());
        assert_eq!(out.dropped, 2);
    }

    #[test]
    fn test_nothing_to_normalize() {
        let profile = barclays::profile().unwrap();
        let out = normalize(&profile, &[raw("xx", "", "", "", "")], "barclays.pdf", None);
        assert!(out.transactions.is_empty());
        assert_eq!(out.dropped, 1);

        let out = Normalizer::new(&profile, "barclays.pdf", Some(2024)).normalize(&[]);
        assert!(out.transactions.is_empty());
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn test_overdrawn_balance_and_labels() {
        let profile = tsb::profile().unwrap();
        let mut record = raw("04 Mar 24", "debt", "", "100.00", "-519.82");
        record.payment_type = Some("FASTER PAYMENT".to_string());
        let out = normalize(&profile, &[record], "TSB_March_2024.pdf", None);
        let txn = &out.transactions[0];
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(txn.balance, dec!(-519.82));
        assert_eq!(txn.money_out, dec!(100.00));
        assert_eq!(txn.transaction_type, TransactionType::Payment);
    }

    #[test]
    fn test_noise_rows_dropped_but_directionless_rows_kept() {
        let profile = tsb::profile().unwrap();
        let mut empty = raw("19 Mar 24", "", "", "", "");
        empty.payment_type = Some("FASTER PAYMENT".to_string());
        let balance_only = raw("20 Mar 24", "", "", "", "376.35");
        let out = normalize(&profile, &[empty, balance_only], "TSB_March_2024.pdf", None);
        assert_eq!(out.transactions.len(), 1);
        assert_eq!(out.dropped, 1);
        assert_eq!(out.transactions[0].transaction_type, TransactionType::Unknown);
        assert_eq!(out.transactions[0].balance, dec!(376.35));
    }

    #[test]
    fn test_amounts_are_non_negative() {
        let profile = nationwide::profile().unwrap();
        let out = normalize(
            &profile,
            &[raw("01 May", "Refund", "-5.00", "", "")],
            "nationwide_May_2024.pdf",
            None,
        );
        assert_eq!(out.transactions[0].money_in, dec!(5.00));
    }
}
