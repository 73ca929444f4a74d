//! Presentation helpers. Amounts are rounded here and nowhere else.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as `$#,##0.00`.
///
/// The exact binary value is rounded half-to-even at the cent, so `2.675`
/// (stored as 2.67499...) becomes `$2.67`.
pub fn format_currency(amount: f64) -> String {
    let Some(exact) = Decimal::from_f64_retain(amount) else {
        return format!("${:.2}", amount);
    };

    let mut cents = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    cents.rescale(2);
    let sign = if cents.is_sign_negative() && !cents.is_zero() {
        "-"
    } else {
        ""
    };

    let text = cents.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(whole), fraction)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// `12.0" × 8.0" × 2.0"`
pub fn format_dimensions(height: f64, width: f64, depth: f64) -> String {
    format!("{:.1}\" × {:.1}\" × {:.1}\"", height, width, depth)
}

pub fn format_percentage(percentage: u32) -> String {
    format!("{}%", percentage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_basic() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_currency(19.008), "$19.01");
        assert_eq!(format_currency(17.28), "$17.28");
    }

    #[test]
    fn test_format_currency_thousands() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(100000.0), "$100,000.00");
    }

    #[test]
    fn test_format_currency_rounds_binary_value() {
        // 2.675 is stored just below the midpoint
        assert_eq!(format_currency(2.675), "$2.67");
        // 0.125 is exact, ties go to even
        assert_eq!(format_currency(0.125), "$0.12");
        assert_eq!(format_currency(0.375), "$0.38");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-1.0), "-$1.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_dimensions() {
        assert_eq!(format_dimensions(12.0, 8.0, 2.0), "12.0\" × 8.0\" × 2.0\"");
        assert_eq!(format_dimensions(12.26, 8.0, 0.5), "12.3\" × 8.0\" × 0.5\"");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(15), "15%");
    }
}
