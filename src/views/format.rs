//! es-AR number formatting.

/// Maximum fraction digits shown for an amount.
const MAX_FRACTION_DIGITS: usize = 3;

/// Formats an amount the es-AR way: `.` groups thousands, `,` separates
/// decimals, at most three fraction digits, trailing zeros dropped.
///
/// ```
/// use shelfscan::views::format_amount_es_ar;
///
/// assert_eq!(format_amount_es_ar(1200.0), "1.200");
/// assert_eq!(format_amount_es_ar(1234.5), "1.234,5");
/// ```
pub fn format_amount_es_ar(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let rounded = format!("{:.*}", MAX_FRACTION_DIGITS, amount.abs());
    let (int_part, frac_part) = rounded
        .split_once('.')
        .unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
    if amount < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// Formats a price as `"{currency} {amount}"`.
pub fn format_price(amount: f64, currency: &str) -> String {
    format!("{} {}", currency, format_amount_es_ar(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_amount_es_ar(0.0), "0");
        assert_eq!(format_amount_es_ar(999.0), "999");
        assert_eq!(format_amount_es_ar(1200.0), "1.200");
        assert_eq!(format_amount_es_ar(1234567.0), "1.234.567");
    }

    #[test]
    fn test_fraction_digits() {
        assert_eq!(format_amount_es_ar(0.5), "0,5");
        assert_eq!(format_amount_es_ar(1200.00), "1.200");
        assert_eq!(format_amount_es_ar(1234567.891), "1.234.567,891");
        assert_eq!(format_amount_es_ar(12.3456), "12,346");
        assert_eq!(format_amount_es_ar(0.0001), "0");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_amount_es_ar(-1500.25), "-1.500,25");
        assert_eq!(format_amount_es_ar(-0.0001), "0");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1200.0, "ARS"), "ARS 1.200");
        assert_eq!(format_price(15.75, "USD"), "USD 15,75");
    }
}
