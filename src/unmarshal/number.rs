//! Numeric literal parsing for `N` and `NS` payloads

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Number;

// Decimal literal as the store writes it. Rejects hex, `NaN`, `Infinity`
// and anything else `f64::from_str` would otherwise accept.
static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap()
});

/// Parse a numeric literal into a JSON number.
///
/// Integer literals that fit `i64` or `u64` are kept exact. Everything else
/// goes through `f64`, so integers beyond 2^64 and fractions with more than
/// ~17 significant digits are rounded.
pub fn parse_number(literal: &str) -> Result<Number, String> {
    let literal = literal.trim();
    if !DECIMAL_REGEX.is_match(literal) {
        return Err(format!("`{}` is not a numeric literal", literal));
    }

    let is_integer = !literal.contains(['.', 'e', 'E']);
    if is_integer {
        if let Ok(n) = literal.parse::<i64>() {
            return Ok(Number::from(n));
        }
        if let Ok(n) = literal.parse::<u64>() {
            return Ok(Number::from(n));
        }
    }

    let float: f64 = literal
        .parse()
        .map_err(|_| format!("`{}` is not a numeric literal", literal))?;
    Number::from_f64(float).ok_or_else(|| format!("`{}` is out of range", literal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_stay_exact() {
        assert_eq!(parse_number("42").unwrap(), Number::from(42));
        assert_eq!(parse_number("-7").unwrap(), Number::from(-7));
        assert_eq!(parse_number("+5").unwrap(), Number::from(5));
        assert_eq!(
            parse_number("9007199254740993").unwrap().as_i64(),
            Some(9_007_199_254_740_993)
        );
        assert_eq!(
            parse_number("18446744073709551615").unwrap().as_u64(),
            Some(u64::MAX)
        );
    }

    #[test]
    fn test_fractions_and_exponents() {
        assert_eq!(parse_number("35.6895").unwrap().as_f64(), Some(35.6895));
        assert_eq!(parse_number(".5").unwrap().as_f64(), Some(0.5));
        assert_eq!(parse_number("1E+2").unwrap().as_f64(), Some(100.0));
        // Past u64 falls back to a float
        assert!(parse_number("123456789012345678901234567890").unwrap().is_f64());
    }

    #[test]
    fn test_rejects_non_numeric() {
        for bad in ["abc", "", "NaN", "inf", "Infinity", "0x10", "1.2.3", "--1", "1e"] {
            assert!(parse_number(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_rejects_overflowing_exponent() {
        let err = parse_number("1e400").unwrap_err();
        assert!(err.contains("out of range"));
    }
}
