//! Barclays current account statements (free text)
//!
//! Expected extracted text:
//!   Your transactions
//!   Date Description Money out £ Money in £ Balance £
//!   02 Apr Card Payment to Tesco Stores
//!   On 31 Mar 12.40 987.60
//!   03 Apr Received From J Smith 250.00 1,237.60
//!
//! A line's first amount is the transaction; a second one is the running balance.

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
        institution: InstitutionId::Barclays,
        file_pattern: Regex::new(r"(?i)barclays")?,
        content_pattern: Regex::new(r"(?i)barclays")?,
        date_anchor: day_month_anchor(false)?,
        date_prefix: short_date_prefix()?,
        date_format: "%d %b",
        amount_token: amount_token(None)?,
        overdrawn_marker: None,
        layout: Layout::FreeText,
        boilerplate: Boilerplate {
            prefixes: vec!["Your transactions", "Date Description", "Barclays Bank UK PLC"],
            patterns: vec![page_footer()?],
            carry_lines: vec!["Start balance", "End balance"],
        },
        amounts: AmountRules {
            pair: PairConvention::AmountThenBalance,
            debit_keywords: None,
            credit_keywords: keywords(r"Received From|Giro Received")?,
            default_direction: Direction::Out,
            trailing_balance: TrailingBalance::Never,
        },
        classification: ClassificationRules::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segmenter;

    #[test]
    fn test_parse_barclays_page() {
        let text = r#"
Barclays Bank UK PLC
Your transactions
Date Description Money out £ Money in £ Balance £
01 Apr Start balance 1,000.00
02 Apr Card Payment to Tesco Stores
On 31 Mar 12.40 987.60
03 Apr Received From J Smith 250.00 1,237.60
Page 2
"#;
        let profile = profile().unwrap();
        let records = Segmenter::new(&profile).segment_page(text);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].date, "02 Apr");
        assert_eq!(records[0].description, "Card Payment to Tesco Stores On 31 Mar");
        assert_eq!(records[0].money_out, "12.40");
        assert_eq!(records[0].money_in, "");
        assert_eq!(records[0].balance, "987.60");

        assert_eq!(records[1].money_in, "250.00");
        assert_eq!(records[1].balance, "1237.60");
    }
}
