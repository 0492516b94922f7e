use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::num::FpCategory;
use core::str::FromStr;

pub use half::f16;
use log::debug;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use thiserror::Error;

use crate::{Decimal, Int, ParseDecimalError};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FloatError {
    #[error("NaN")]
    Nan,
    #[error("Inf")]
    Infinite,
}
impl FloatError {
    pub fn from_category(category: FpCategory) -> Result<(), Self> {
        match category {
            FpCategory::Nan => Err(FloatError::Nan),
            FpCategory::Infinite => Err(FloatError::Infinite),
            _ => Ok(()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFloatError {
    #[error("could not parse string as float: {0}")]
    ParseFailed(#[from] ParseDecimalError),
    #[error("invalid float: {0}")]
    Invalid(#[from] FloatError),
}

/// The number of fractional digits used when rendering a float in scientific notation.
///
/// Mirrors the `{scientific, Decimals}` option of `float_to_list/2`, where `Decimals`
/// must be in `0..=249`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScientificDigits(u8);
impl ScientificDigits {
    pub const MAX_U8: u8 = 249;

    pub fn new(digits: u8) -> Option<Self> {
        if digits <= Self::MAX_U8 {
            Some(Self(digits))
        } else {
            None
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}
impl Default for ScientificDigits {
    fn default() -> Self {
        // Same as `float_to_list(Float, [{scientific, 20}])`
        Self(20)
    }
}
impl TryFrom<usize> for ScientificDigits {
    type Error = ();

    fn try_from(digits: usize) -> Result<Self, Self::Error> {
        u8::try_from(digits)
            .ok()
            .and_then(Self::new)
            .ok_or(())
    }
}
impl From<ScientificDigits> for usize {
    fn from(digits: ScientificDigits) -> usize {
        digits.get()
    }
}

/// An Erlang float.
///
/// Every float carries the exact decimal value it represents. Modern floats are always
/// the value of some finite IEEE-754 double: constructing one from text re-parses the
/// input through `f64`, which may round it. Legacy (`old`) floats keep the decimal they
/// were constructed from, but must still lie within the finite range of a double.
///
/// Equality, ordering and hashing are defined on the exact value. For a modern float that
/// is the value of the double, so an old float equals a modern one only when its decimal
/// is exactly that double.
#[derive(Clone)]
pub struct Float {
    value: f64,
    decimal: Decimal,
    old: bool,
}
impl Float {
    const I64_UPPER_BOUNDARY: f64 = (1i64 << f64::MANTISSA_DIGITS) as f64;
    const I64_LOWER_BOUNDARY: f64 = (-1i64 << f64::MANTISSA_DIGITS) as f64;

    /// Creates a modern float from a finite double; negative zero becomes zero
    pub fn new(float: f64) -> Result<Float, FloatError> {
        FloatError::from_category(float.classify())?;
        let value = if float == 0.0 { 0.0 } else { float };
        let decimal = Decimal::from_f64(value).ok_or(FloatError::Infinite)?;
        Ok(Self {
            value,
            decimal,
            old: false,
        })
    }

    /// Creates a modern float from an exact decimal, rounding it to the nearest double
    pub fn from_decimal(decimal: Decimal) -> Result<Float, FloatError> {
        let value = decimal.to_f64();
        let float = Self::new(value)?;
        if float.decimal != decimal {
            debug!("float {} normalized to {}", &decimal, &float.decimal);
        }
        Ok(float)
    }

    /// Creates a legacy float which keeps the exact decimal it was given
    pub fn old(decimal: Decimal) -> Result<Float, FloatError> {
        let value = decimal.to_f64();
        FloatError::from_category(value.classify())?;
        let value = if value == 0.0 { 0.0 } else { value };
        Ok(Self {
            value,
            decimal,
            old: true,
        })
    }

    /// Parses a legacy float string, such as the NUL-padded text of the old external format
    pub fn old_from_str(s: &str) -> Result<Float, ParseFloatError> {
        let decimal = s.parse::<Decimal>()?;
        Ok(Self::old(decimal)?)
    }

    /// Get this float as a raw f64 value
    #[inline(always)]
    pub fn inner(&self) -> f64 {
        self.value
    }

    /// Obtain this floating-point value as a raw 64-bit value
    #[inline(always)]
    pub fn raw(&self) -> u64 {
        self.value.to_bits()
    }

    /// The exact value of this float
    #[inline]
    pub fn decimal(&self) -> &Decimal {
        &self.decimal
    }

    /// Returns true if this float was constructed from a legacy encoding
    #[inline]
    pub fn is_old(&self) -> bool {
        self.old
    }

    /// Returns true if this float is zero
    pub fn is_zero(&self) -> bool {
        self.decimal.is_zero()
    }

    /// Returns true if this float has no fractional part
    pub fn is_integral(&self) -> bool {
        if self.old {
            self.decimal.is_integral()
        } else {
            self.value.fract() == 0.0
        }
    }

    /// Returns the exact integer value of this float, if it has no fractional part
    ///
    /// For modern floats this is the value of the double itself, which for large
    /// magnitudes differs from the shortest decimal that prints it.
    pub fn to_integer(&self) -> Option<Int> {
        if self.old {
            return self.decimal.to_integer().map(Int::from);
        }
        if !self.is_integral() {
            return None;
        }
        let (mantissa, exponent) = decompose(self.value);
        let integer = if exponent >= 0 {
            mantissa << exponent as usize
        } else {
            mantissa >> exponent.unsigned_abs() as usize
        };
        Some(Int::from(integer))
    }

    /// Returns whether this float is more precise than an integer of the same magnitude
    pub fn is_precise(&self) -> bool {
        self.value >= Self::I64_LOWER_BOUNDARY && self.value <= Self::I64_UPPER_BOUNDARY
    }

    /// Renders this float in Erlang's canonical form, e.g. `1.00000000000000000000e+12`
    pub fn to_erlang_string(&self) -> String {
        self.to_scientific_string(ScientificDigits::default())
    }

    /// Renders this float as `float_to_list(F, [{scientific, N}])` would
    pub fn to_scientific_string(&self, digits: ScientificDigits) -> String {
        self.decimal.to_scientific(digits.get())
    }

    /// Exact comparison against an integer
    pub fn cmp_int(&self, int: &Int) -> Ordering {
        // Cheap path when both values are exactly representable as doubles
        if let Int::Small(i) = int {
            if !self.old && i.unsigned_abs() < (1u64 << f64::MANTISSA_DIGITS) {
                return self.value.total_cmp(&(*i as f64));
            }
        }
        if self.old {
            return self.decimal.cmp(&int.to_decimal());
        }
        let int = match int {
            Int::Small(i) => BigInt::from(*i),
            Int::Big(i) => i.clone(),
        };
        // Compare `mantissa * 2^exponent` against the integer without rounding either side
        let (mantissa, exponent) = decompose(self.value);
        if exponent >= 0 {
            (mantissa << exponent as usize).cmp(&int)
        } else {
            mantissa.cmp(&(int << exponent.unsigned_abs() as usize))
        }
    }
}

/// Splits a finite double into an integer mantissa and a binary exponent, such that
/// `value == mantissa * 2^exponent` exactly
fn decompose(value: f64) -> (BigInt, i32) {
    const FRACTION_BITS: u32 = f64::MANTISSA_DIGITS - 1;
    const EXPONENT_BIAS: i32 = 1023 + FRACTION_BITS as i32;

    let bits = value.to_bits();
    let negative = (bits >> 63) != 0;
    let biased = ((bits >> FRACTION_BITS) & 0x7FF) as i32;
    let fraction = bits & ((1u64 << FRACTION_BITS) - 1);
    let (mantissa, exponent) = if biased == 0 {
        // Subnormal
        (fraction, 1 - EXPONENT_BIAS)
    } else {
        (fraction | (1u64 << FRACTION_BITS), biased - EXPONENT_BIAS)
    };
    let mantissa = BigInt::from(mantissa);
    if negative {
        (-mantissa, exponent)
    } else {
        (mantissa, exponent)
    }
}

/// The exact decimal expansion of a finite double
fn exact_decimal(value: f64) -> Decimal {
    let (mantissa, exponent) = decompose(value);
    if exponent >= 0 {
        Decimal::from(&(mantissa << exponent as usize))
    } else {
        // m * 2^-k == m * 5^k * 10^-k
        let k = exponent.unsigned_abs();
        Decimal::from_scaled(&(mantissa * BigInt::from(5).pow(k)), -(k as i64))
    }
}

impl FromStr for Float {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = s.parse::<Decimal>()?;
        Ok(Self::from_decimal(decimal)?)
    }
}
impl fmt::Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_erlang_string())
    }
}
impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_erlang_string())
    }
}
impl Ord for Float {
    fn cmp(&self, other: &Self) -> Ordering {
        // Shortest decimals of two doubles order the same way as the doubles
        match (self.old, other.old) {
            (true, false) => self.decimal.cmp(&exact_decimal(other.value)),
            (false, true) => exact_decimal(self.value).cmp(&other.decimal),
            _ => self.decimal.cmp(&other.decimal),
        }
    }
}
impl PartialOrd for Float {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // An old float holding exactly a double hashes like the modern float of that double
        if self.old && self.decimal == exact_decimal(self.value) {
            if let Some(shortest) = Decimal::from_f64(self.value) {
                return shortest.hash(state);
            }
        }
        self.decimal.hash(state)
    }
}
impl Eq for Float {}
impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl PartialEq<Int> for Float {
    fn eq(&self, y: &Int) -> bool {
        self.cmp_int(y) == Ordering::Equal
    }
}
impl PartialEq<Float> for Int {
    fn eq(&self, y: &Float) -> bool {
        y.cmp_int(self) == Ordering::Equal
    }
}
impl PartialOrd<Int> for Float {
    fn partial_cmp(&self, other: &Int) -> Option<Ordering> {
        Some(self.cmp_int(other))
    }
}
impl PartialOrd<Float> for Int {
    fn partial_cmp(&self, other: &Float) -> Option<Ordering> {
        Some(other.cmp_int(self).reverse())
    }
}
impl TryFrom<f64> for Float {
    type Error = FloatError;

    #[inline]
    fn try_from(f: f64) -> Result<Self, Self::Error> {
        Self::new(f)
    }
}
impl TryFrom<f32> for Float {
    type Error = FloatError;

    #[inline]
    fn try_from(f: f32) -> Result<Self, Self::Error> {
        Self::new(f as f64)
    }
}
impl TryFrom<f16> for Float {
    type Error = FloatError;

    #[inline]
    fn try_from(f: f16) -> Result<Self, Self::Error> {
        Self::new(f.to_f64())
    }
}
impl From<Float> for f64 {
    #[inline(always)]
    fn from(f: Float) -> f64 {
        f.value
    }
}
impl ToPrimitive for Float {
    #[inline]
    fn to_f64(&self) -> Option<f64> {
        Some(self.value)
    }

    #[inline]
    fn to_f32(&self) -> Option<f32> {
        Some(self.value as f32)
    }

    fn to_i64(&self) -> Option<i64> {
        ToPrimitive::to_i64(&self.value)
    }

    fn to_u64(&self) -> Option<u64> {
        ToPrimitive::to_u64(&self.value)
    }
}
