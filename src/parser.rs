// 💴 Price Parser - free-text numeric input validation
// A bad price is a skip, not an error: every failure collapses to None.

/// Parse user-entered price text into a non-negative value.
///
/// Accepts plain numbers with optional thousands-separator commas
/// ("120", "980.5", "1,200"). Whitespace is trimmed first.
///
/// Returns `None` for:
/// - empty / whitespace-only input (treated as "nothing entered")
/// - anything that does not parse as a number
/// - negative values (rejected, not clamped)
/// - non-finite values (NaN / infinity)
pub fn parse_price(text: &str) -> Option<f64> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    let value = s.replace(',', "").parse::<f64>().ok()?;

    if !value.is_finite() || value < 0.0 {
        return None;
    }

    Some(value)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse_price("120"), Some(120.0));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(parse_price("980.5"), Some(980.5));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_price("1,200"), Some(1200.0));
        assert_eq!(parse_price("1,234,567.89"), Some(1234567.89));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(parse_price("  42  "), Some(42.0));
    }

    #[test]
    fn test_zero_is_valid() {
        assert_eq!(parse_price("0"), Some(0.0));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("   "), None);
    }

    #[test]
    fn test_non_numeric() {
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("12x"), None);
        assert_eq!(parse_price("¥100"), None);
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(parse_price("-5"), None);
        assert_eq!(parse_price("-0.01"), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }
}
