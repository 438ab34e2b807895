//! TSB statements
//!
//! Native extraction yields a table:
//!   | Date | Payment type | Details | Money Out (£) | Money In (£) | Balance (£) |
//!   | 04 Mar 24 | FASTER PAYMENT | debt | 100.00 |  | 519.82 OD |
//!
//! OCR output of the same page loses the cell borders and is read as free text
//! (`04 Mar 24 FASTER PAYMENT debt 100.00`). `OD` marks an overdrawn balance.

use anyhow::Result;
use regex::Regex;
use tally_core::TransactionType;

use super::{amount_token, day_month_anchor, keywords, page_footer, short_date_prefix};
use crate::profile::{
    AmountRules, Boilerplate, ClassificationRules, Column, Direction, FormatProfile, LabelType,
    Layout, PairConvention, TableLayout, TrailingBalance,
};
use crate::types::InstitutionId;

pub fn profile() -> Result<FormatProfile> {
    Ok(FormatProfile {
        institution: InstitutionId::Tsb,
        file_pattern: Regex::new(r"(?i)tsb|psb")?,
        content_pattern: Regex::new(r"(?i)\bTSB\b|\bPSB\b")?,
        date_anchor: day_month_anchor(true)?,
        date_prefix: short_date_prefix()?,
        date_format: "%d %b %y",
        amount_token: amount_token(Some("OD"))?,
        overdrawn_marker: Some("OD"),
        layout: Layout::Table(TableLayout {
            separator: '|',
            columns: vec![
                Column::Date,
                Column::PaymentType,
                Column::Description,
                Column::MoneyOut,
                Column::MoneyIn,
                Column::Balance,
            ],
            cell_break: "<br>",
        }),
        boilerplate: Boilerplate {
            prefixes: vec![
                "PDF Redactor Free",
                "Fees Explained",
                "Continued on next page",
                "Statement number",
                "Classic Plus Account",
                "Your Transactions",
                "Notification of forthcoming fees",
                "Monthly cap on unarranged overdraft charges",
            ],
            patterns: vec![page_footer()?],
            carry_lines: Vec::new(),
        },
        amounts: AmountRules {
            pair: PairConvention::DebitFirst,
            debit_keywords: None,
            credit_keywords: keywords(r"CASH DEPOSIT|DIRECT CREDIT|TRANSFER FROM")?,
            default_direction: Direction::Out,
            trailing_balance: TrailingBalance::Never,
        },
        classification: ClassificationRules {
            labels: vec![
                (
                    "FASTER PAYMENT",
                    LabelType::ByDirection {
                        money_in: TransactionType::Credit,
                        money_out: TransactionType::Payment,
                    },
                ),
                ("DIRECT DEBIT", LabelType::Fixed(TransactionType::DirectDebit)),
                ("CASH DEPOSIT", LabelType::Fixed(TransactionType::Deposit)),
                ("DIRECT CREDIT", LabelType::Fixed(TransactionType::Credit)),
                (
                    "TRANSFER",
                    LabelType::ByDirection {
                        money_in: TransactionType::TransferIn,
                        money_out: TransactionType::TransferOut,
                    },
                ),
                ("SERVICE CHARGES", LabelType::Fixed(TransactionType::Fee)),
                ("CASH WITHDRAWAL", LabelType::Fixed(TransactionType::Withdrawal)),
                ("DEBIT CARD", LabelType::Fixed(TransactionType::Debit)),
            ],
            descriptions: Vec::new(),
        },
    })
}
