use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

pub use num_bigint::{ToBigInt, ToBigUint};
pub use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use num_bigint::{BigInt, BigUint, ParseBigIntError};

use crate::Decimal;

/// This struct unifies the fixed-width and arbitrary precision integral types.
///
/// Values which fit in an `i64` are always represented as `Small`, so two integers
/// with the same value always have the same representation.
#[derive(Debug, Clone, Hash)]
pub enum Int {
    Small(i64),
    Big(BigInt),
}
impl Int {
    #[inline]
    pub const fn new(i: i64) -> Self {
        Self::Small(i)
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Small(num) => *num == 0,
            Self::Big(num) => num.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Self::Small(num) => *num < 0,
            Self::Big(num) => num.is_negative(),
        }
    }

    pub fn abs(&self) -> Self {
        match self {
            Self::Small(num) => match num.checked_abs() {
                Some(abs) => Self::Small(abs),
                None => Self::Big(BigInt::from(*num).abs()),
            },
            Self::Big(num) => Self::Big(num.abs()),
        }
    }

    /// Converts this integer to the nearest double, or an infinity if the magnitude is too large
    pub fn to_float(&self) -> f64 {
        match self {
            Self::Small(int) => *int as f64,
            Self::Big(int) => int.to_f64().unwrap_or_else(|| {
                if int.is_negative() {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }),
        }
    }

    /// The exact decimal value of this integer
    pub fn to_decimal(&self) -> Decimal {
        match self {
            Self::Small(i) => Decimal::from(*i),
            Self::Big(i) => Decimal::from(i),
        }
    }

    pub fn from_string_radix(string: &str, radix: u32) -> Option<Self> {
        if let Ok(i) = i64::from_str_radix(string, radix) {
            return Some(Self::new(i));
        }
        let bi = BigInt::parse_bytes(string.as_bytes(), radix)?;
        Some(bi.into())
    }

    /// Returns the character with this code point, if it is one
    pub fn to_char(&self) -> Option<char> {
        match self {
            Self::Small(i) => u32::try_from(*i).ok().and_then(char::from_u32),
            _ => None,
        }
    }

    pub fn to_usize(&self) -> Option<usize> {
        match self {
            Self::Small(i) => (*i).try_into().ok(),
            _ => None,
        }
    }

    /// Determines the fewest bits necessary to express this integer value, not including the sign
    pub fn bits(&self) -> u64 {
        match self {
            Self::Big(i) => i.bits(),
            Self::Small(i) => {
                let i = *i;
                if i >= 0 {
                    (64 - i.leading_zeros()) as u64
                } else {
                    (64 - i.leading_ones()) as u64
                }
            }
        }
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Small(int) => int.fmt(f),
            Self::Big(int) => int.fmt(f),
        }
    }
}

impl FromStr for Int {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, ParseBigIntError> {
        match s.parse::<i64>() {
            Ok(i) => Ok(Self::new(i)),
            Err(_) => s.parse::<BigInt>().map(Self::from),
        }
    }
}

impl Eq for Int {}
impl PartialEq for Int {
    fn eq(&self, rhs: &Int) -> bool {
        match (self, rhs) {
            (Self::Small(lhs), Self::Small(rhs)) => lhs.eq(rhs),
            (Self::Big(lhs), Self::Big(rhs)) => lhs.eq(rhs),
            // A normalized big integer never fits in an i64
            _ => false,
        }
    }
}
impl PartialEq<i64> for Int {
    fn eq(&self, rhs: &i64) -> bool {
        match self {
            Self::Small(lhs) => lhs.eq(rhs),
            Self::Big(_) => false,
        }
    }
}
impl PartialEq<Int> for i64 {
    fn eq(&self, rhs: &Int) -> bool {
        rhs.eq(self)
    }
}

impl Ord for Int {
    fn cmp(&self, rhs: &Self) -> Ordering {
        match (self, rhs) {
            (Self::Small(lhs), Self::Small(rhs)) => lhs.cmp(rhs),
            (Self::Small(lhs), Self::Big(rhs)) => {
                let lhs = BigInt::from(*lhs);
                lhs.cmp(rhs)
            }
            (Self::Big(lhs), Self::Small(rhs)) => {
                let rhs = BigInt::from(*rhs);
                lhs.cmp(&rhs)
            }
            (Self::Big(lhs), Self::Big(rhs)) => lhs.cmp(rhs),
        }
    }
}
impl PartialOrd for Int {
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}
impl PartialOrd<i64> for Int {
    fn partial_cmp(&self, rhs: &i64) -> Option<Ordering> {
        match self {
            Self::Small(lhs) => lhs.partial_cmp(rhs),
            Self::Big(lhs) => {
                let rhs = BigInt::from(*rhs);
                lhs.partial_cmp(&rhs)
            }
        }
    }
}
impl PartialOrd<Int> for i64 {
    fn partial_cmp(&self, rhs: &Int) -> Option<Ordering> {
        rhs.partial_cmp(self).map(|v| v.reverse())
    }
}

impl ToBigInt for Int {
    fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Self::Small(int) => Some(BigInt::from(*int)),
            Self::Big(num) => Some(num.clone()),
        }
    }
}
impl ToBigUint for Int {
    fn to_biguint(&self) -> Option<BigUint> {
        match self {
            Self::Small(i) if *i >= 0 => Some(BigUint::from(*i as u64)),
            Self::Small(_) => None,
            Self::Big(i) => i.to_biguint(),
        }
    }
}

impl ToPrimitive for Int {
    fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Small(i) => Some(*i),
            Self::Big(i) => i.to_i64(),
        }
    }

    fn to_u64(&self) -> Option<u64> {
        match self {
            Self::Small(i) => i.to_u64(),
            Self::Big(i) => i.to_u64(),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.to_float())
    }
}

impl FromPrimitive for Int {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::new(n))
    }

    fn from_u64(n: u64) -> Option<Self> {
        Some(n.into())
    }
}

macro_rules! small_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Int {
                #[inline(always)]
                fn from(i: $ty) -> Self {
                    Self::Small(i.into())
                }
            }
        )*
    };
}

small_int_from!(u8, u16, u32, i8, i16, i32, i64);

macro_rules! wide_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Int {
                fn from(i: $ty) -> Self {
                    match i64::try_from(i) {
                        Ok(small) => Self::Small(small),
                        Err(_) => Self::Big(BigInt::from(i)),
                    }
                }
            }
        )*
    };
}

wide_int_from!(u64, usize, i128, u128, isize);

impl From<char> for Int {
    #[inline]
    fn from(i: char) -> Self {
        Self::Small(i as i64)
    }
}
impl From<BigInt> for Int {
    #[inline]
    fn from(i: BigInt) -> Self {
        match i.to_i64() {
            Some(n) => Self::Small(n),
            None => Self::Big(i),
        }
    }
}
impl From<BigUint> for Int {
    #[inline]
    fn from(i: BigUint) -> Self {
        BigInt::from(i).into()
    }
}
impl TryFrom<&Int> for u8 {
    type Error = ();

    fn try_from(i: &Int) -> Result<u8, Self::Error> {
        match i {
            Int::Small(i) => (*i).try_into().map_err(|_| ()),
            Int::Big(_) => Err(()),
        }
    }
}
impl TryFrom<&Int> for i64 {
    type Error = ();

    fn try_from(i: &Int) -> Result<i64, Self::Error> {
        match i {
            Int::Small(i) => Ok(*i),
            Int::Big(_) => Err(()),
        }
    }
}
