//! Virgin Money (and Clydesdale Bank branded) statements (free text)
//!
//! Columns: Date, Description, Debits, Credits, Balance. A lone amount is a credit unless the
//! description marks a card or mobile-banking payment.

use anyhow::Result;
use regex::Regex;

use super::{amount_token, day_month_anchor, keywords, page_footer, short_date_prefix};
use crate::profile::{
    AmountRules, Boilerplate, ClassificationRules, Direction, FormatProfile, Layout,
    PairConvention, TrailingBalance,
};
use crate::types::InstitutionId;

pub fn profile() -> Result<FormatProfile> {
    Ok(FormatProfile {
        institution: InstitutionId::VirginMoney,
        file_pattern: Regex::new(r"(?i)bunmite|virgin[ _-]?money|clydesdale")?,
        content_pattern: Regex::new(r"(?i)Virgin Money|Clydesdale Bank")?,
        date_anchor: day_month_anchor(false)?,
        date_prefix: short_date_prefix()?,
        date_format: "%d %b",
        amount_token: amount_token(None)?,
        overdrawn_marker: None,
        layout: Layout::FreeText,
        boilerplate: Boilerplate {
            prefixes: vec!["Previous statement", "Balance brought forward", "Statement No"],
            patterns: vec![page_footer()?, Regex::new(r"(?i)^Virgin Money(?: plc)?$")?],
            carry_lines: Vec::new(),
        },
        amounts: AmountRules {
            pair: PairConvention::DebitFirst,
            debit_keywords: keywords(r"Card|(?i:\bmb\b)")?,
            credit_keywords: None,
            default_direction: Direction::In,
            trailing_balance: TrailingBalance::LastOfPair,
        },
        classification: ClassificationRules::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segmenter;

    #[test]
    fn test_parse_virgin_money_page() {
        let text = r#"
Virgin Money
Statement No 42
Balance brought forward 520.00
12 Mar Card 1234 Costa Coffee 3.20
13 Mar Salary ACME LTD 1,500.00
14 Mar MB Transfer to savings
100.00 1,916.80
Page 1 of 2
"#;
        let profile = profile().unwrap();
        let records = Segmenter::new(&profile).segment_page(text);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].money_out, "3.20");
        assert_eq!(records[1].money_in, "1500.00");
        assert_eq!(records[1].money_out, "");

        // Two amounts on a line read debit-first; the pair's last value is also the balance.
        assert_eq!(records[2].description, "MB Transfer to savings");
        assert_eq!(records[2].money_out, "100.00");
        assert_eq!(records[2].money_in, "1916.80");
        assert_eq!(records[2].balance, "1916.80");
    }

    #[test]
    fn test_transaction_naming_the_bank_is_kept() {
        let text = "\
12 Mar Card 1234 Costa Coffee 3.20
13 Mar MB Transfer to Virgin Money Credit Card
REF 99 50.00
14 Mar Salary ACME 900.00";
        let profile = profile().unwrap();
        let records = Segmenter::new(&profile).segment_page(text);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].description, "Card 1234 Costa Coffee");
        assert_eq!(records[0].money_in, "");

        assert_eq!(records[1].description, "MB Transfer to Virgin Money Credit Card REF 99");
        assert_eq!(records[1].money_out, "50.00");

        assert_eq!(records[2].money_in, "900.00");
    }
}
