//! Numeric literal parsing: signed integer, then unsigned integer, then a
//! 32-bit float whose bit pattern is reinterpreted as an integer.
//!
//! Radix autodetection follows C conventions: `0x` hex, leading `0`
//! octal, otherwise decimal.

pub fn parse_number(token: &str) -> Option<i64> {
    parse_signed(token).or_else(|| parse_unsigned(token)).or_else(|| parse_float_bits(token))
}

fn strip_sign(token: &str) -> (bool, &str) {
    if let Some(rest) = token.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = token.strip_prefix('+') {
        (false, rest)
    } else {
        (false, token)
    }
}

fn radix_digits(token: &str) -> (u32, &str) {
    if let Some(rest) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        (16, rest)
    } else if token.len() > 1 && token.starts_with('0') {
        (8, &token[1..])
    } else {
        (10, token)
    }
}

fn parse_signed(token: &str) -> Option<i64> {
    if token.is_empty() {
        return None;
    }
    let (neg, unsigned_part) = strip_sign(token);
    let (radix, digits) = radix_digits(unsigned_part);
    if digits.is_empty() {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if neg { -magnitude } else { magnitude })
}

fn parse_unsigned(token: &str) -> Option<i64> {
    let (radix, digits) = radix_digits(token);
    if digits.is_empty() {
        return None;
    }
    let v = u64::from_str_radix(digits, radix).ok()?;
    Some(v as i64)
}

fn parse_float_bits(token: &str) -> Option<i64> {
    let f: f32 = token.parse().ok()?;
    Some(f.to_bits() as i32 as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("-7"), Some(-7));
    }

    #[test]
    fn parses_hex_with_0x_prefix() {
        assert_eq!(parse_number("0x1F"), Some(31));
    }

    #[test]
    fn parses_octal_with_leading_zero() {
        assert_eq!(parse_number("010"), Some(8));
    }

    #[test]
    fn parses_unsigned_overflowing_signed_range() {
        let token = (u32::MAX as u64).to_string();
        assert_eq!(parse_number(&token), Some(u32::MAX as i64));
    }

    #[test]
    fn parses_float_as_reinterpreted_bits() {
        let bits = parse_number("1.5").unwrap();
        let back = f32::from_bits(bits as u32);
        assert_eq!(back, 1.5f32);
    }

    #[test]
    fn non_numeric_token_fails_all_three() {
        assert_eq!(parse_number("hello"), None);
    }
}
