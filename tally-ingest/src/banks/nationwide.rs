//! Nationwide FlexPlus / current account statements (free text)
//!
//! Columns: Date, Description, £Out, £In, £Balance. Descriptions often wrap onto a second
//! line that carries the amounts.

use anyhow::Result;
use regex::Regex;
use tally_core::TransactionType;

use super::{amount_token, day_month_anchor, keywords, page_footer, short_date_prefix};
use crate::profile::{
    AmountRules, Boilerplate, ClassificationRules, Direction, FormatProfile, Layout,
    PairConvention, TrailingBalance,
};
use crate::types::InstitutionId;

pub fn profile() -> Result<FormatProfile> {
    Ok(FormatProfile {
        institution: InstitutionId::Nationwide,
        file_pattern: Regex::new(r"(?i)nationwide")?,
        content_pattern: Regex::new(r"(?i)nationwide")?,
        date_anchor: day_month_anchor(false)?,
        date_prefix: short_date_prefix()?,
        date_format: "%d %b",
        amount_token: amount_token(None)?,
        overdrawn_marker: None,
        layout: Layout::FreeText,
        boilerplate: Boilerplate {
            prefixes: vec![
                "Balance from statement",
                "Your FlexPlus",
                "PDF-Redacter-Free",
                "Please check your statement",
                "Interest, Rates and Fees",
                "Effective Date",
            ],
            patterns: vec![page_footer()?],
            carry_lines: Vec::new(),
        },
        amounts: AmountRules {
            pair: PairConvention::DebitFirst,
            debit_keywords: None,
            credit_keywords: keywords(r"Bank credit|Cash credit|Transfer from")?,
            default_direction: Direction::Out,
            trailing_balance: TrailingBalance::SingleTokenAtLineEnd,
        },
        classification: ClassificationRules {
            labels: Vec::new(),
            descriptions: vec![
                ("Bank credit", TransactionType::Credit),
                ("Cash credit", TransactionType::Credit),
                ("Transfer to", TransactionType::TransferOut),
                ("Transfer from", TransactionType::TransferIn),
                ("Direct debit", TransactionType::DirectDebit),
                ("Monthly Account Fee", TransactionType::Fee),
            ],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segmenter;

    #[test]
    fn test_parse_nationwide_page() {
        let text = r#"
Your FlexPlus account
Balance from statement 12 1,000.00
05 Apr Contactless Payment
TESCO STORES 3012 12.50
06 Apr Bank credit ACME LTD 1,200.00
Effective Date 05 Apr
07 Apr Direct debit COUNCIL TAX 140.00 2,047.50
Page 1 of 3
"#;
        let profile = profile().unwrap();
        let records = Segmenter::new(&profile).segment_page(text);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].description, "Contactless Payment TESCO STORES 3012");
        assert_eq!(records[0].money_out, "12.50");
        // A lone amount at line end also fills the empty balance.
        assert_eq!(records[0].balance, "12.50");

        assert_eq!(records[1].money_in, "1200.00");
        assert_eq!(records[1].description, "Bank credit ACME LTD");

        assert_eq!(records[2].money_out, "140.00");
        assert_eq!(records[2].money_in, "2047.50");
    }

    #[test]
    fn test_wrapped_credit_keeps_its_direction() {
        let text = "06 Apr Bank credit ACME LTD\nREF 99 1,200.00\n07 Apr Transfer to SAVINGS\nREF 12 50.00";
        let profile = profile().unwrap();
        let records = Segmenter::new(&profile).segment_page(text);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].money_in, "1200.00");
        assert_eq!(records[0].money_out, "");
        assert_eq!(records[1].money_out, "50.00");
    }
}
