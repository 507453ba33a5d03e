//! Lenient numeric parsing. Malformed values fall back to defaults instead of
//! failing the row.

/// Parse a decimal, ignoring surrounding whitespace. Non-finite values are
/// treated as unparsable.
pub(crate) fn decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a population count. Thousands separators are accepted, fractions
/// are truncated and anything unparsable or negative becomes zero.
pub(crate) fn population(raw: &str) -> u64 {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '_' | ' '))
        .collect();
    if let Ok(count) = digits.parse::<u64>() {
        return count;
    }
    decimal(&digits)
        .filter(|value| *value > 0.0)
        .map_or(0, |value| value.trunc() as u64)
}

/// Parse an evangelical share into a fraction in `[0, 1]`.
///
/// `percent` marks sources that express the share as a percentage. A trailing
/// `%` is always read as a percentage.
pub(crate) fn evangelical(raw: &str, percent: bool) -> f64 {
    let trimmed = raw.trim();
    let (number, percent) = match trimmed.strip_suffix('%') {
        Some(stripped) => (stripped, true),
        None => (trimmed, percent),
    };
    let Some(value) = decimal(number) else {
        return 0.0;
    };
    let fraction = if percent { value / 100.0 } else { value };
    fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12.5", Some(12.5))]
    #[case("  -3 ", Some(-3.0))]
    #[case("", None)]
    #[case("north", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    fn parses_decimals(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(decimal(raw), expected);
    }

    #[rstest]
    #[case("1234", 1_234)]
    #[case("1,234,567", 1_234_567)]
    #[case(" 42.9 ", 42)]
    #[case("-5", 0)]
    #[case("unknown", 0)]
    #[case("", 0)]
    fn parses_populations(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(population(raw), expected);
    }

    #[rstest]
    #[case("0.05", false, 0.05)]
    #[case("5", true, 0.05)]
    #[case("5%", false, 0.05)]
    #[case("150", true, 1.0)]
    #[case("-0.2", false, 0.0)]
    #[case("n/a", false, 0.0)]
    fn parses_evangelical_shares(#[case] raw: &str, #[case] percent: bool, #[case] expected: f64) {
        assert!((evangelical(raw, percent) - expected).abs() < 1e-12);
    }
}
