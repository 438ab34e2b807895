//! Amount parsing shared by the segmenter and the normalizer.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a statement amount such as `1,234.56`, `£60.00`, `-15.00` or `114.08 OD`.
///
/// `overdrawn_marker` is the institution's suffix for a negative balance (for example `OD`);
/// a value carrying it comes back negative. Thousands separators and currency symbols are
/// ignored. Returns `None` when no number can be recovered.
pub fn parse_amount(raw: &str, overdrawn_marker: Option<&str>) -> Option<Decimal> {
    let mut s = raw.trim();
    let mut negative = false;

    if let Some(marker) = overdrawn_marker {
        if let Some(stripped) = strip_suffix_ignore_case(s, marker) {
            s = stripped.trim_end();
            negative = true;
        }
    }

    // A minus sign counts only when it precedes the first digit ("-15.00", "£-15.00", "- £5.82").
    let before_digits = s.split(|c: char| c.is_ascii_digit()).next().unwrap_or("");
    if before_digits.contains('-') {
        negative = true;
    }

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || s.len() < suffix.len() {
        return None;
    }
    let split = s.len() - suffix.len();
    let tail = s.get(split..)?;
    if tail.eq_ignore_ascii_case(suffix) {
        s.get(..split)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strips_thousands_and_currency() {
        assert_eq!(parse_amount("1,599.81", None), Some(dec!(1599.81)));
        assert_eq!(parse_amount("£60.00", None), Some(dec!(60.00)));
        assert_eq!(parse_amount(" $5.82 ", None), Some(dec!(5.82)));
    }

    #[test]
    fn test_overdrawn_marker_is_negative() {
        assert_eq!(parse_amount("114.08 OD", Some("OD")), Some(dec!(-114.08)));
        assert_eq!(parse_amount("319.82OD", Some("OD")), Some(dec!(-319.82)));
        // Without a configured marker the suffix is just noise.
        assert_eq!(parse_amount("114.08 OD", None), Some(dec!(114.08)));
    }

    #[test]
    fn test_leading_minus() {
        assert_eq!(parse_amount("-15.00", None), Some(dec!(-15.00)));
        assert_eq!(parse_amount("- $14.05", None), Some(dec!(-14.05)));
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(parse_amount("", None), None);
        assert_eq!(parse_amount("   ", Some("OD")), None);
        assert_eq!(parse_amount("OD", Some("OD")), None);
    }

    #[test]
    fn test_four_decimal_places_survive() {
        assert_eq!(parse_amount("40.6500", None), Some(dec!(40.65)));
    }
}
