//! Binaries and bitstrings.
//!
//! A [`Bitstring`] is an immutable, reference-counted byte buffer plus the number of
//! significant bits in its final byte. When that count is 8 the value is a plain
//! binary. Unused bits of the final byte are always zero, so two bitstrings with the
//! same logical content have identical buffers.
mod bitstring;
pub mod helpers;
mod iter;

pub use self::bitstring::{Bitstring, BitstringError};
pub use self::iter::BitsIter;

/// Represents how the bytes of an unsigned integer are laid out in a binary.
///
/// Big-endian stores the most-significant byte first, little-endian stores the
/// least-significant byte first, and native follows the target platform.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endianness {
    /// Most-significant bits "first"
    Big = 0,
    Little,
    Native,
}
impl Endianness {
    /// Resolves `Native` to the byte order of the target
    pub fn resolve(self) -> Self {
        match self {
            Self::Native if cfg!(target_endian = "little") => Self::Little,
            Self::Native => Self::Big,
            other => other,
        }
    }
}
