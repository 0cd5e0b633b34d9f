//! Defensive numeric handling for values reported by upstream feed servers

use serde_json::Value;

/// Upper bound for any usage figure: 100 PiB in bytes.
pub const MAX_REASONABLE_VALUE: u64 = 1_125_899_906_842_624 * 100;

/// Clamp an untrusted number into `[0, MAX_REASONABLE_VALUE]`.
///
/// Non-finite input (`NaN`, `±inf`) yields `0`; fractional parts are dropped.
///
/// # Examples
/// ```
/// use nodepin::utils::number::{validate_number, MAX_REASONABLE_VALUE};
///
/// assert_eq!(validate_number(f64::NAN), 0);
/// assert_eq!(validate_number(-3.0), 0);
/// assert_eq!(validate_number(42.0), 42);
/// assert_eq!(validate_number(1e30), MAX_REASONABLE_VALUE);
/// ```
pub fn validate_number(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if value >= MAX_REASONABLE_VALUE as f64 {
        return MAX_REASONABLE_VALUE;
    }
    value.trunc() as u64
}

/// Loosely convert header text to a number.
///
/// Blank text is `0`, `0x` prefixed text is read as hexadecimal and anything
/// unparsable becomes `NaN`, which [`validate_number`] later maps to `0`.
pub fn parse_number(input: &str) -> f64 {
    let input = input.trim();
    if input.is_empty() {
        return 0.0;
    }
    if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN);
    }
    match input {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if input.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            f64::NAN
        }
        _ => input.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Coerce a JSON port value (number or numeric string) into a port number.
///
/// Anything missing, non-numeric or outside `1..=65535` becomes `0`, which
/// marks the node as unusable.
pub fn coerce_port(value: Option<&Value>) -> u16 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        _ => return 0,
    };
    if !number.is_finite() {
        return 0;
    }
    let port = number.trunc();
    if (1.0..=u16::MAX as f64).contains(&port) {
        port as u16
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_finite_and_negative_are_zero() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -1.0, -1e20] {
            assert_eq!(validate_number(value), 0, "input {value}");
        }
    }

    #[test]
    fn test_in_range_values_pass_through() {
        for value in [0u64, 1, 123_456_789, MAX_REASONABLE_VALUE] {
            assert_eq!(validate_number(value as f64), value);
        }
    }

    #[test]
    fn test_values_above_ceiling_are_clamped() {
        assert_eq!(
            validate_number(MAX_REASONABLE_VALUE as f64 * 2.0),
            MAX_REASONABLE_VALUE
        );
        assert_eq!(validate_number(f64::MAX), MAX_REASONABLE_VALUE);
    }

    #[test]
    fn test_validate_is_idempotent() {
        for value in [f64::NAN, -7.0, 0.0, 55.9, 1e18, f64::INFINITY] {
            let once = validate_number(value);
            assert_eq!(validate_number(once as f64), once);
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 123 "), 123.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("0x10"), 16.0);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("12abc").is_nan());
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_coerce_port() {
        assert_eq!(coerce_port(Some(&json!(443))), 443);
        assert_eq!(coerce_port(Some(&json!("8388"))), 8388);
        assert_eq!(coerce_port(Some(&json!("abc"))), 0);
        assert_eq!(coerce_port(Some(&json!(70000))), 0);
        assert_eq!(coerce_port(Some(&json!(true))), 0);
        assert_eq!(coerce_port(None), 0);
    }
}
