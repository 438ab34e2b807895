//! Tabular output of canonical transactions.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{CanonicalTransaction, Ledger};
use tracing::{info, warn};

pub const HEADERS: [&str; 8] = [
    "Date",
    "Transaction Type",
    "Money In",
    "Money Out",
    "Bank Name",
    "Statement Month",
    "Description",
    "Balance",
];

/// `consolidated_statements_<YYYY-MM-DD>.csv`
pub fn ledger_file_name(day: NaiveDate) -> String {
    format!("consolidated_statements_{}.csv", day.format("%Y-%m-%d"))
}

/// Header row followed by one row per transaction.
pub fn write_csv<W: Write>(writer: W, transactions: &[CanonicalTransaction]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADERS)?;
    for txn in transactions {
        wtr.serialize(txn)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the ledger into `output_dir`. An empty ledger writes nothing and returns `None`.
pub fn write_ledger(ledger: &Ledger, output_dir: &Path, day: NaiveDate) -> Result<Option<PathBuf>> {
    if ledger.is_empty() {
        warn!("no transactions extracted, nothing written");
        return Ok(None);
    }
    fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;
    let path = output_dir.join(ledger_file_name(day));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, ledger.transactions()).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), rows = ledger.len(), "ledger written");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::{TransactionType, merge};

    fn txn() -> CanonicalTransaction {
        CanonicalTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            transaction_type: TransactionType::TransferIn,
            money_in: dec!(300.00),
            money_out: dec!(0),
            bank_name: "Nationwide".to_string(),
            statement_month: "Mar 2024".to_string(),
            description: "Transfer from J BLOGGS, ref 2291".to_string(),
            balance: dec!(-114.08),
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[txn()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Transaction Type,Money In,Money Out,Bank Name,Statement Month,Description,Balance")
        );
        assert_eq!(
            lines.next(),
            Some("2024-03-04,Transfer In,300.00,0,Nationwide,Mar 2024,\"Transfer from J BLOGGS, ref 2291\",-114.08")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_ledger_file() {
        let dir = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        let written = write_ledger(&merge(Vec::new()), dir.path(), day).unwrap();
        assert_eq!(written, None);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        let out = dir.path().join("out");
        let path = write_ledger(&merge(vec![txn(), txn()]), &out, day).unwrap().unwrap();
        assert_eq!(path, out.join("consolidated_statements_2025-05-01.csv"));
        assert_eq!(fs::read_to_string(path).unwrap().lines().count(), 2);
    }
}
