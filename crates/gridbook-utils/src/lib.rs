//! Utility functions and helpers

use rust_decimal::Decimal;
use std::str::FromStr;

/// Format an amount with dot-grouped thousands and a comma decimal
/// separator (id-ID convention), e.g. `1234567.5` -> `"1.234.567,5"`.
pub fn format_amount(amount: Decimal) -> String {
    let s = amount.abs().to_string();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (s, None),
    };

    let mut grouped = String::new();
    let mut count = 0;
    for c in int_part.chars().rev() {
        if count == 3 {
            grouped.push('.');
            count = 0;
        }
        grouped.push(c);
        count += 1;
    }
    let mut result: String = grouped.chars().rev().collect();

    if let Some(frac) = frac_part {
        result.push(',');
        result.push_str(&frac);
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        result.insert(0, '-');
    }
    result
}

/// Parse a currency input back into a decimal.
///
/// Accepts a leading "Rp" prefix, spaces, dots as thousands separators and
/// a comma as the decimal separator. Returns `None` for anything that does
/// not reduce to a finite number; callers treat that as "no change".
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let mut trimmed = value.trim();
    if let Some(rest) = trimmed.strip_prefix("Rp").or_else(|| trimmed.strip_prefix("rp")) {
        trimmed = rest.trim_start();
    }
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | ' '))
    {
        return None;
    }

    let cleaned = trimmed
        .replace([' ', '.'], "")
        .replace(',', ".");

    Decimal::from_str(&cleaned).ok()
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(Decimal::from(75626)), "75.626");
        assert_eq!(format_amount(Decimal::from(6403971)), "6.403.971");
        assert_eq!(format_amount(Decimal::from(100)), "100");
        assert_eq!(format_amount(Decimal::from(0)), "0");
    }

    #[test]
    fn test_format_amount_negative_and_fraction() {
        assert_eq!(format_amount(Decimal::from(-18900)), "-18.900");
        assert_eq!(format_amount(Decimal::new(12345, 2)), "123,45");
    }

    #[test]
    fn test_parse_amount_round_trip() {
        assert_eq!(parse_amount("75.626"), Some(Decimal::from(75626)));
        assert_eq!(parse_amount("Rp 6.403.971"), Some(Decimal::from(6403971)));
        assert_eq!(parse_amount("123,45"), Some(Decimal::new(12345, 2)));
        assert_eq!(parse_amount("-18.900"), Some(Decimal::from(-18900)));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("12a34"), None);
        assert_eq!(parse_amount("--5"), None);
    }
}
