//! Field normalization applied to every raw keystroke before it reaches the draft.
//!
//! All functions here are pure: the same field and raw text always produce the
//! same normalized value.

use crate::domain::coupon::{FormattedAmount, TextField};

pub const MAX_DISCOUNT_RATE: u8 = 100;
const GROUP_SEPARATOR: char = ',';
const GROUP_SIZE: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NormalizedValue {
    Text(String),
    Percent(u8),
    Quantity(u64),
    Amount(FormattedAmount),
}

pub fn normalize(field: TextField, raw: &str) -> NormalizedValue {
    match field {
        TextField::DiscountRate => NormalizedValue::Percent(normalize_discount_rate(raw)),
        TextField::TotalQuantity => NormalizedValue::Quantity(normalize_total_quantity(raw)),
        TextField::MaxDiscount => NormalizedValue::Amount(normalize_max_discount(raw)),
        TextField::Name => NormalizedValue::Text(raw.to_string()),
    }
}

pub fn normalize_discount_rate(raw: &str) -> u8 {
    let clamped = parse_leading_integer(raw).clamp(0, i64::from(MAX_DISCOUNT_RATE));
    u8::try_from(clamped).unwrap_or(MAX_DISCOUNT_RATE)
}

pub fn normalize_total_quantity(raw: &str) -> u64 {
    u64::try_from(parse_leading_integer(raw).max(0)).unwrap_or(0)
}

pub fn normalize_max_discount(raw: &str) -> FormattedAmount {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return FormattedAmount::empty();
    }

    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };
    FormattedAmount::from_grouped(group_thousands(significant))
}

/// Reads the integer prefix of `raw`: leading whitespace, an optional sign and
/// the longest run of ASCII digits. Input without digits reads as zero and
/// magnitudes outside `i64` saturate.
pub fn parse_leading_integer(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in unsigned.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / GROUP_SIZE);
    let lead = digits.len() % GROUP_SIZE;

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (index + GROUP_SIZE - lead) % GROUP_SIZE == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}
