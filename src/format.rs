//! Number formatting for chart captions.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

fn currency_formatter(prefix: &'static str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .inspect_err(|error| tracing::error!("could not create currency formatter: {error}"))
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
}

/// Amounts from here up are written without thousands separators, numfmt
/// only has scientific notation for them.
const MAX_GROUPED_AMOUNT: f64 = 1e15;

/// Pad a formatted number to exactly two decimal places.
///
/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and
/// "12.00" as "12".
fn pad_decimals(mut formatted: String) -> String {
    match formatted.rfind('.') {
        None => formatted.push_str(".00"),
        Some(index) if formatted.len() - index == 2 => formatted.push('0'),
        Some(_) => {}
    }

    formatted
}

/// Format `number` as dollars with thousands separators and two decimal
/// places, e.g. "$1,234.50" or "-$0.25".
///
/// The number is rounded to whole cents first. NaN and infinities are shown
/// as "$0.00", the same way unreadable amounts count as zero in the totals.
/// Amounts numfmt would write in scientific notation are written without
/// thousands separators instead.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let number = if number.is_finite() {
        (number * 100.0).round() / 100.0
    } else {
        0.0
    };

    let (formatter, prefix) = if number < 0.0 {
        (NEGATIVE_FMT.get_or_init(|| currency_formatter("-$")), "-$")
    } else if number > 0.0 {
        (POSITIVE_FMT.get_or_init(|| currency_formatter("$")), "$")
    } else {
        // Zero is hardcoded as "0" by numfmt.
        return "$0.00".to_owned();
    };

    let plain = || format!("{prefix}{:.2}", number.abs());

    if number.abs() >= MAX_GROUPED_AMOUNT {
        return plain();
    }

    match formatter {
        Some(formatter) => {
            let formatted = formatter.fmt_string(number.abs());

            if formatted.contains('e') {
                plain()
            } else {
                pad_decimals(formatted)
            }
        }
        None => plain(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_currency, pad_decimals};

    #[test]
    fn zero_has_two_decimals() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn negative_numbers_have_sign_before_symbol() {
        assert_eq!(format_currency(-12.5), "-$12.50");
        assert_eq!(format_currency(-0.25), "-$0.25");
    }

    #[test]
    fn positive_numbers_have_symbol_and_separators() {
        assert_eq!(format_currency(3.25), "$3.25");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(format_currency(0.001), "$0.00");
        assert_eq!(format_currency(-0.004), "$0.00");
        assert_eq!(format_currency(0.005), "$0.01");
        assert_eq!(format_currency(0.01), "$0.01");
        assert_eq!(format_currency(19.999), "$20.00");
    }

    #[test]
    fn huge_amounts_are_not_in_scientific_notation() {
        assert_eq!(format_currency(1e16), "$10000000000000000.00");
        assert_eq!(format_currency(-1e16), "-$10000000000000000.00");
    }

    #[test]
    fn non_finite_amounts_are_zero() {
        assert_eq!(format_currency(f64::NAN), "$0.00");
        assert_eq!(format_currency(f64::INFINITY), "$0.00");
        assert_eq!(format_currency(f64::NEG_INFINITY), "$0.00");
    }

    #[test]
    fn pads_missing_decimals() {
        assert_eq!(pad_decimals("$12".to_owned()), "$12.00");
        assert_eq!(pad_decimals("$12.3".to_owned()), "$12.30");
        assert_eq!(pad_decimals("$1,012.34".to_owned()), "$1,012.34");
    }
}
