//! Numeric values with Erlang semantics.
//!
//! Integers are either small (`i64`) or arbitrary precision (`BigInt`), and are
//! always normalized to the small representation when they fit. Floats carry the
//! exact decimal value they were constructed from, so that legacy ("old") floats
//! can be represented without loss, while modern floats are always the value of
//! a finite IEEE-754 double.
mod decimal;
mod float;
mod integer;

pub use self::decimal::{Decimal, ParseDecimalError};
pub use self::float::{Float, FloatError, ParseFloatError, ScientificDigits};
pub use self::integer::Int;

pub use half::f16;
pub use num_bigint as bigint;
pub use num_bigint::{BigInt, BigUint, Sign};
pub use num_traits as traits;
pub use num_traits::{FromPrimitive, ToPrimitive, Zero};
