//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an unsigned digit string with a thousands separator
pub fn format_number(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format a decimal amount with fixed decimal places and custom separators,
/// e.g. `1234.5` -> `1.234,50`
pub fn format_amount(
    amount: Decimal,
    decimal_places: u32,
    thousands_separator: &str,
    decimal_separator: &str,
) -> String {
    let rounded = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&format_number(int_part, thousands_separator));
    if let Some(frac) = frac_part {
        out.push_str(decimal_separator);
        out.push_str(frac);
    }
    out
}

/// Format a currency value with its symbol in front, e.g. `R$ 1.234,50`
pub fn format_currency(
    amount: Decimal,
    symbol: &str,
    decimal_places: u32,
    thousands_separator: &str,
    decimal_separator: &str,
) -> String {
    format!(
        "{} {}",
        symbol,
        format_amount(amount, decimal_places, thousands_separator, decimal_separator)
    )
}

/// Generate a unique record ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number("1234567", "."), "1.234.567");
        assert_eq!(format_number("123", "."), "123");
        assert_eq!(format_number("0", ","), "0");
    }

    #[test]
    fn test_format_amount_brazilian() {
        assert_eq!(format_amount(dec("1234.5"), 2, ".", ","), "1.234,50");
        assert_eq!(format_amount(dec("0"), 2, ".", ","), "0,00");
        assert_eq!(format_amount(dec("-40.125"), 2, ".", ","), "-40,13");
    }

    #[test]
    fn test_format_amount_no_decimals() {
        assert_eq!(format_amount(dec("1999.99"), 0, ",", "."), "2,000");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec("150"), "R$", 2, ".", ","), "R$ 150,00");
    }

    #[test]
    fn test_generate_id_is_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
