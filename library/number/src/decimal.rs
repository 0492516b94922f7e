use core::cmp::Ordering;
use core::fmt;
use core::num::IntErrorKind;
use core::str::FromStr;

use num_bigint::{BigInt, Sign};
use thiserror::Error;

/// Produced when a string cannot be parsed as a decimal value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDecimalError {
    #[error("expected at least one digit")]
    Empty,
    #[error("invalid character '{0}' in decimal literal")]
    InvalidDigit(char),
    #[error("invalid exponent '{0}'")]
    InvalidExponent(String),
    #[error("decimal exponent is out of range")]
    ExponentOverflow,
}

/// An exact base-10 number.
///
/// The value is kept in normalized scientific form, `d.ddd * 10^exponent`, where the
/// digit string never has leading or trailing zeros. Zero is represented by an empty
/// digit string and is never negative. Because the representation is canonical, two
/// decimals are equal if and only if their fields are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    digits: Box<str>,
    exponent: i64,
}
impl Decimal {
    /// Returns the decimal value zero
    pub fn zero() -> Self {
        Self {
            negative: false,
            digits: Box::from(""),
            exponent: 0,
        }
    }

    /// Returns the exact decimal expansion of the shortest representation of `value`
    /// which parses back to the same double.
    ///
    /// Returns `None` if `value` is NaN or infinite.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value == 0.0 {
            return Some(Self::zero());
        }
        // `{:e}` produces the shortest round-tripping digits, e.g. `1.5e-7`
        format!("{:e}", value).parse().ok()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The significant digits of this value, without sign or decimal point
    #[inline]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The power of ten applied to the first significant digit
    #[inline]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Returns true if this value has no fractional part
    pub fn is_integral(&self) -> bool {
        self.is_zero() || self.exponent >= (self.digits.len() as i64 - 1)
    }

    /// Converts this value to the nearest double.
    ///
    /// Values beyond the range of `f64` produce an infinity, which callers are expected to reject.
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        match self.to_literal().parse::<f64>() {
            Ok(value) => value,
            Err(_) => unreachable!("normalized decimal digits always form a valid float literal"),
        }
    }

    /// Converts this value to an integer, if it has no fractional part
    pub fn to_integer(&self) -> Option<BigInt> {
        if self.is_zero() {
            return Some(BigInt::from(0));
        }
        if !self.is_integral() {
            return None;
        }
        let zeros = (self.exponent - (self.digits.len() as i64 - 1)) as usize;
        let mut buf = String::with_capacity(self.digits.len() + zeros + 1);
        if self.negative {
            buf.push('-');
        }
        buf.push_str(&self.digits);
        buf.extend(core::iter::repeat('0').take(zeros));
        buf.parse().ok()
    }

    /// Renders this value in scientific notation with exactly `fraction_digits` digits after
    /// the decimal point, in the style of Erlang's `float_to_list/2` with `{scientific, N}`.
    ///
    /// Digits beyond the requested precision are truncated, missing digits are padded with
    /// zeros, and the exponent always carries a sign and at least two digits.
    pub fn to_scientific(&self, fraction_digits: usize) -> String {
        let mut buf = String::with_capacity(fraction_digits + 8);
        if self.negative {
            buf.push('-');
        }

        let digits = self.digits.as_bytes();
        let (first, rest, exponent) = match digits.split_first() {
            None => (b'0', &[][..], 0),
            Some((first, rest)) => (*first, rest, self.exponent),
        };

        buf.push(first as char);
        if fraction_digits > 0 {
            buf.push('.');
            for i in 0..fraction_digits {
                buf.push(rest.get(i).copied().unwrap_or(b'0') as char);
            }
        }

        buf.push('e');
        buf.push(if exponent < 0 { '-' } else { '+' });
        let magnitude = exponent.unsigned_abs();
        if magnitude < 10 {
            buf.push('0');
        }
        buf.push_str(&magnitude.to_string());
        buf
    }

    /// Builds a decimal from the base-10 digits of an integer magnitude
    fn from_integer(negative: bool, magnitude: &str) -> Self {
        let significant = magnitude.trim_start_matches('0');
        if significant.is_empty() {
            return Self::zero();
        }
        let trimmed = significant.trim_end_matches('0');
        Self {
            negative,
            digits: Box::from(trimmed),
            exponent: significant.len() as i64 - 1,
        }
    }

    /// Returns the exact value of `mantissa * 10^exponent`
    pub fn from_scaled(mantissa: &BigInt, exponent: i64) -> Self {
        let mut value = Self::from(mantissa);
        if !value.is_zero() {
            value.exponent += exponent;
        }
        value
    }

    /// The shortest literal for this value, e.g. `-1.25e3`
    fn to_literal(&self) -> String {
        if self.is_zero() {
            return "0e0".to_string();
        }
        let sign = if self.negative { "-" } else { "" };
        let (first, rest) = self.digits.split_at(1);
        if rest.is_empty() {
            format!("{}{}e{}", sign, first, self.exponent)
        } else {
            format!("{}{}.{}e{}", sign, first, rest, self.exponent)
        }
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .exponent
                .cmp(&other.exponent)
                .then_with(|| self.digits.cmp(&other.digits)),
        }
    }
}
impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from_integer(value < 0, &value.unsigned_abs().to_string())
    }
}
impl From<&BigInt> for Decimal {
    fn from(value: &BigInt) -> Self {
        Self::from_integer(value.sign() == Sign::Minus, &value.magnitude().to_string())
    }
}
impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}
impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parses decimal literals such as `12`, `-0.5`, `1.0e+10` or `.25E-3`.
    ///
    /// Trailing NUL padding and surrounding whitespace are ignored, which permits parsing
    /// the fixed-width strings used by legacy float encodings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_end_matches('\0').trim();
        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
            Some(index) => (&unsigned[..index], Some(&unsigned[(index + 1)..])),
            None => (unsigned, None),
        };

        let mut digits = String::with_capacity(mantissa.len());
        let mut fraction_len = 0i64;
        let mut seen_point = false;
        for c in mantissa.chars() {
            match c {
                '0'..='9' => {
                    digits.push(c);
                    if seen_point {
                        fraction_len += 1;
                    }
                }
                '.' if !seen_point => seen_point = true,
                other => return Err(ParseDecimalError::InvalidDigit(other)),
            }
        }
        if digits.is_empty() {
            return Err(ParseDecimalError::Empty);
        }

        let exponent = match exponent {
            None => 0,
            Some(e) => e.parse::<i64>().map_err(|err| match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ParseDecimalError::ExponentOverflow
                }
                _ => ParseDecimalError::InvalidExponent(e.to_string()),
            })?,
        };

        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Ok(Self::zero());
        }
        let trimmed = significant.trim_end_matches('0');
        let trailing = (significant.len() - trimmed.len()) as i64;
        let exponent = exponent
            .checked_sub(fraction_len)
            .and_then(|e| e.checked_add(trailing))
            .and_then(|e| e.checked_add(trimmed.len() as i64 - 1))
            .ok_or(ParseDecimalError::ExponentOverflow)?;

        Ok(Self {
            negative,
            digits: Box::from(trimmed),
            exponent,
        })
    }
}
impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}
impl PartialOrd for Decimal {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn decimal_normalizes_leading_and_trailing_zeros() {
        let d = decimal("000120.500");
        assert_eq!(d.digits(), "1205");
        assert_eq!(d.exponent(), 2);
        assert!(!d.is_negative());

        let d = decimal("-0.00125e2");
        assert_eq!(d.digits(), "125");
        assert_eq!(d.exponent(), -1);
        assert!(d.is_negative());

        assert_eq!(decimal("1200"), decimal("1.2e3"));
        assert_eq!(decimal(".5"), decimal("5e-1"));
    }

    #[test]
    fn decimal_zero_is_unsigned() {
        assert!(decimal("-0.000").is_zero());
        assert!(!decimal("-0.0").is_negative());
        assert_eq!(decimal("-0.0"), Decimal::zero());
    }

    #[test]
    fn decimal_ignores_nul_padding() {
        let padded = "1.00000000000000000000e+00\0\0\0\0\0";
        assert_eq!(decimal(padded), decimal("1"));
    }

    #[test]
    fn decimal_rejects_malformed_input() {
        assert_eq!("".parse::<Decimal>(), Err(ParseDecimalError::Empty));
        assert_eq!("e10".parse::<Decimal>(), Err(ParseDecimalError::Empty));
        assert_eq!("inf".parse::<Decimal>(), Err(ParseDecimalError::InvalidDigit('i')));
        assert_eq!("1.2.3".parse::<Decimal>(), Err(ParseDecimalError::InvalidDigit('.')));
        assert!(matches!(
            "1e".parse::<Decimal>(),
            Err(ParseDecimalError::InvalidExponent(_))
        ));
        assert_eq!(
            "1e99999999999999999999".parse::<Decimal>(),
            Err(ParseDecimalError::ExponentOverflow)
        );
    }

    #[test]
    fn decimal_ordering() {
        let mut values = vec![
            decimal("10"),
            decimal("-2.5"),
            decimal("0"),
            decimal("9.99"),
            decimal("-10"),
            decimal("0.001"),
            decimal("10.5"),
        ];
        values.sort();
        let sorted: Vec<String> = values.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            sorted,
            vec!["-1e1", "-2.5e0", "0e0", "1e-3", "9.99e0", "1e1", "1.05e1"]
        );
    }

    #[test]
    fn decimal_from_f64_uses_shortest_digits() {
        let d = Decimal::from_f64(0.1).unwrap();
        assert_eq!(d.digits(), "1");
        assert_eq!(d.exponent(), -1);
        assert_eq!(Decimal::from_f64(1e12).unwrap(), decimal("1000000000000"));
        assert_eq!(Decimal::from_f64(f64::INFINITY), None);
        assert_eq!(Decimal::from_f64(f64::NAN), None);
    }

    #[test]
    fn decimal_to_f64() {
        assert_eq!(decimal("1.5e-7").to_f64(), 1.5e-7);
        assert_eq!(decimal("-42").to_f64(), -42.0);
        assert_eq!(decimal("0").to_f64(), 0.0);
        assert!(decimal("1e400").to_f64().is_infinite());
    }

    #[test]
    fn decimal_from_integers() {
        assert_eq!(Decimal::from(0i64), Decimal::zero());
        assert_eq!(Decimal::from(-1200i64), decimal("-1.2e3"));
        assert_eq!(Decimal::from(i64::MIN), decimal("-9223372036854775808"));
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(Decimal::from(&big), decimal("1.2345678901234567890123456789e29"));
    }

    #[test]
    fn decimal_to_integer() {
        assert_eq!(decimal("1.2e3").to_integer(), Some(BigInt::from(1200)));
        assert_eq!(decimal("-7").to_integer(), Some(BigInt::from(-7)));
        assert_eq!(decimal("1.5").to_integer(), None);
        assert_eq!(decimal("0").to_integer(), Some(BigInt::from(0)));
    }

    #[test]
    fn decimal_to_scientific() {
        assert_eq!(decimal("0").to_scientific(20), "0.00000000000000000000e+00");
        assert_eq!(decimal("1e12").to_scientific(20), "1.00000000000000000000e+12");
        assert_eq!(decimal("-1.5e-7").to_scientific(3), "-1.500e-07");
        assert_eq!(decimal("1.23456").to_scientific(2), "1.23e+00");
        assert_eq!(decimal("1e100").to_scientific(1), "1.0e+100");
        assert_eq!(decimal("7.9").to_scientific(0), "7e+00");
    }
}
