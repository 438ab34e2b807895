//! Transaction type classification.
//!
//! Priority: institution label rules (exact, upper-cased raw label), then direction
//! (`Received` / `Payment` / `Unknown`); institution description rules are applied last and
//! override either result when a description substring matches.

use rust_decimal::Decimal;
use tally_core::TransactionType;
use tally_ingest::profile::{ClassificationRules, LabelType};

pub fn classify(
    rules: &ClassificationRules,
    label: Option<&str>,
    description: &str,
    money_in: Decimal,
    money_out: Decimal,
) -> TransactionType {
    let by_direction = TransactionType::from_direction(money_in, money_out);

    let by_label = label
        .map(|l| l.trim().to_uppercase())
        .filter(|l| !l.is_empty())
        .and_then(|l| rules.labels.iter().find(|(key, _)| *key == l))
        .and_then(|(_, rule)| match *rule {
            LabelType::Fixed(t) => Some(t),
            LabelType::ByDirection { money_in: t, .. } if money_in > Decimal::ZERO => Some(t),
            LabelType::ByDirection { money_out: t, .. } if money_out > Decimal::ZERO => Some(t),
            LabelType::ByDirection { .. } => None,
        });

    rules
        .descriptions
        .iter()
        .find(|(needle, _)| description.contains(needle))
        .map(|(_, t)| *t)
        .or(by_label)
        .unwrap_or(by_direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_ingest::banks::{nationwide, tsb};

    #[test]
    fn test_label_rules() {
        let rules = tsb::profile().unwrap().classification;
        let t = |label, i, o| classify(&rules, Some(label), "", i, o);
        assert_eq!(t("FASTER PAYMENT", dec!(0), dec!(100.00)), TransactionType::Payment);
        assert_eq!(t("faster payment", dec!(70.00), dec!(0)), TransactionType::Credit);
        assert_eq!(t("DIRECT DEBIT", dec!(0), dec!(0)), TransactionType::DirectDebit);
        assert_eq!(t("CASH DEPOSIT", dec!(580), dec!(0)), TransactionType::Deposit);
        assert_eq!(t("TRANSFER", dec!(0), dec!(20)), TransactionType::TransferOut);
        assert_eq!(t("TRANSFER", dec!(20), dec!(0)), TransactionType::TransferIn);
        assert_eq!(t("SERVICE CHARGES", dec!(0), dec!(8.33)), TransactionType::Fee);
        assert_eq!(t("DEBIT CARD", dec!(0), dec!(3)), TransactionType::Debit);
    }

    #[test]
    fn test_unknown_label_falls_back_to_direction() {
        let rules = tsb::profile().unwrap().classification;
        assert_eq!(
            classify(&rules, Some("STANDING ORDER"), "", dec!(0), dec!(50)),
            TransactionType::Payment
        );
        assert_eq!(
            classify(&rules, Some("FASTER PAYMENT"), "", dec!(0), dec!(0)),
            TransactionType::Unknown
        );
        assert_eq!(classify(&rules, None, "", dec!(12), dec!(0)), TransactionType::Received);
    }

    #[test]
    fn test_description_rules() {
        let rules = nationwide::profile().unwrap().classification;
        let t = |d, i, o| classify(&rules, None, d, i, o);
        assert_eq!(t("Bank credit ACME LTD", dec!(1200), dec!(0)), TransactionType::Credit);
        assert_eq!(t("Transfer to SAVINGS", dec!(0), dec!(50)), TransactionType::TransferOut);
        assert_eq!(t("Transfer from J BLOGGS", dec!(300), dec!(0)), TransactionType::TransferIn);
        assert_eq!(t("Direct debit COUNCIL TAX", dec!(0), dec!(140)), TransactionType::DirectDebit);
        assert_eq!(t("Monthly Account Fee", dec!(0), dec!(13)), TransactionType::Fee);
        assert_eq!(t("Contactless Payment TESCO", dec!(0), dec!(12.50)), TransactionType::Payment);
    }
}
