//! Numeric and string coercion rules.
//!
//! These are the ECMA-3 flavored conversions the AVM inherited. The
//! canonical number formatting produced by [`number_to_string`] doubles as
//! the routing key for values that fail index coercion, so `-0` and `0`
//! collapse to the same key and `NaN`/`Infinity` keep their literal names.

/// Canonical decimal formatting for a number.
///
/// - NaN is `"NaN"`, the infinities are `"Infinity"` / `"-Infinity"`
/// - `-0.0` formats as `"0"`
/// - integral values inside the exactly-representable range print without a
///   fractional part (`42`, not `42.0`)
/// - everything else uses the shortest round-trip decimal form
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.trunc() == n && n.abs() < 9_007_199_254_740_992.0 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// Parse a string as a numeric literal.
///
/// Surrounding whitespace is ignored, the empty string is 0, `0x` prefixes
/// select hexadecimal, and `Infinity` is honored with an optional sign.
/// Anything else that is not a decimal literal is NaN.
pub fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(hex) = strip_hex_prefix(s) {
        return parse_hex(hex);
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust's f64 parser also accepts "inf" and "nan" spellings that the
    // runtime must reject, so gate on the decimal-literal alphabet first.
    if s.bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .filter(|rest| !rest.is_empty())
}

fn parse_hex(digits: &str) -> f64 {
    let mut acc: f64 = 0.0;
    for b in digits.bytes() {
        let d = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return f64::NAN,
        };
        acc = acc * 16.0 + d as f64;
    }
    acc
}

/// ECMA ToUint32: truncate and wrap into `[0, 2^32)`.
///
/// NaN and the infinities map to 0. Used for the numeric sort-flags
/// argument.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let t = n.trunc();
    let m = t.rem_euclid(4_294_967_296.0);
    m as u32
}

/// Case folding for case-insensitive string comparison.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}
