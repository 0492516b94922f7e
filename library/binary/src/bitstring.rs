use core::cmp::Ordering;
use core::fmt;
use core::ops::{Bound, RangeBounds};
use std::sync::Arc;

use num_bigint::BigUint;
use thiserror::Error;

use crate::helpers::{self, bitmask_be, next_index, splice_bits};
use crate::{BitsIter, Endianness};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitstringError {
    #[error("invalid number of bits in the final byte: {0}, expected a value in 1..=8")]
    InvalidBits(u8),
    #[error("operation requires a binary, but the final byte only has {0} bits")]
    Unaligned(u8),
    #[error("range {start}..{end} is out of bounds for a binary of {size} bytes")]
    OutOfRange {
        start: usize,
        end: usize,
        size: usize,
    },
}

/// An immutable sequence of bits.
///
/// The final byte of the buffer holds `bits` significant high-order bits, the rest
/// of it is zero. A bitstring whose final byte is full is a binary. The empty
/// bitstring is the empty binary.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitstring {
    data: Arc<[u8]>,
    bits: u8,
}
impl Bitstring {
    /// Creates a bitstring from `bytes`, of which only the high `bits` bits of the
    /// last byte are significant
    pub fn new<B: Into<Vec<u8>>>(bytes: B, bits: u8) -> Result<Self, BitstringError> {
        if bits == 0 || bits > 8 {
            return Err(BitstringError::InvalidBits(bits));
        }
        Ok(Self::from_parts(bytes.into(), bits))
    }

    /// Creates a binary from the given bytes
    pub fn from_bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self::from_parts(bytes.into(), 8)
    }

    /// Returns the empty binary
    pub fn empty() -> Self {
        Self {
            data: Arc::from(Vec::new()),
            bits: 8,
        }
    }

    fn from_parts(mut data: Vec<u8>, bits: u8) -> Self {
        debug_assert!(bits > 0 && bits <= 8);
        match data.last_mut() {
            None => Self::empty(),
            Some(last) => {
                *last &= bitmask_be(bits);
                Self {
                    data: data.into(),
                    bits,
                }
            }
        }
    }

    /// The number of bits in this bitstring
    pub fn bit_size(&self) -> usize {
        match self.data.len() {
            0 => 0,
            n => (n - 1) * 8 + self.bits as usize,
        }
    }

    /// The number of bytes needed to hold this bitstring, including a partial final byte
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// The number of significant bits in the final byte, in `1..=8`
    #[inline]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// The number of bits beyond the last full byte, 0 for binaries
    #[inline]
    pub fn trailing_bits(&self) -> u8 {
        self.bits % 8
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        self.bits == 8
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying buffer, including the partial final byte
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the contents as a string if this is a binary of valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        if self.is_binary() {
            core::str::from_utf8(&self.data).ok()
        } else {
            None
        }
    }

    fn ensure_binary(&self) -> Result<(), BitstringError> {
        if self.is_binary() {
            Ok(())
        } else {
            Err(BitstringError::Unaligned(self.bits))
        }
    }

    /// Returns the byte at `index`.
    ///
    /// Byte indexing is not supported for bitstrings whose size is not a multiple of 8.
    pub fn byte_at(&self, index: usize) -> Result<Option<u8>, BitstringError> {
        self.ensure_binary()?;
        Ok(self.data.get(index).copied())
    }

    /// Returns the first byte of this binary
    pub fn first(&self) -> Result<Option<u8>, BitstringError> {
        self.byte_at(0)
    }

    /// Returns the last byte of this binary
    pub fn last(&self) -> Result<Option<u8>, BitstringError> {
        self.ensure_binary()?;
        Ok(self.data.last().copied())
    }

    /// Returns the bit at `index` as `0` or `1`
    pub fn bit_at(&self, index: usize) -> Option<u8> {
        self.bits_iter().nth(index)
    }

    /// Iterates over the bits of this bitstring, most-significant first
    pub fn bits_iter(&self) -> BitsIter<'_> {
        BitsIter::new(&self.data, self.bit_size())
    }

    /// Extracts up to `len` bits starting at bit `start`.
    ///
    /// Returns `None` if `start` lies beyond the end of this bitstring. The length is
    /// clamped to the bits available, and the result is a binary when its size is a
    /// multiple of 8.
    pub fn bitslice(&self, start: usize, len: usize) -> Option<Self> {
        let size = self.bit_size();
        if start > size {
            return None;
        }
        let len = len.min(size - start);
        if len == 0 {
            return Some(Self::empty());
        }
        if start == 0 && len == size {
            return Some(self.clone());
        }

        let (index, offset) = next_index(0, 0, start);
        let byte = |i: usize| self.data.get(i).copied().unwrap_or(0);
        let full_bytes = len / 8;
        let rem = (len % 8) as u8;

        let mut data = Vec::with_capacity(full_bytes + 1);
        for i in index..(index + full_bytes) {
            data.push(splice_bits(byte(i), byte(i + 1), offset));
        }
        if rem > 0 {
            let i = index + full_bytes;
            data.push(splice_bits(byte(i), byte(i + 1), offset));
            Some(Self::from_parts(data, rem))
        } else {
            Some(Self::from_parts(data, 8))
        }
    }

    /// Like `bitslice`, but takes a range of bit positions
    pub fn bitslice_range<R: RangeBounds<usize>>(&self, range: R) -> Option<Self> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.bit_size(),
        };
        self.bitslice(start, end.saturating_sub(start))
    }

    /// Extracts `len` bytes starting at byte `start`, as `binary:part/3`
    pub fn part(&self, start: usize, len: usize) -> Result<Self, BitstringError> {
        self.ensure_binary()?;
        let size = self.data.len();
        match start.checked_add(len) {
            Some(end) if end <= size => {
                if start == 0 && end == size {
                    Ok(self.clone())
                } else {
                    Ok(Self::from_bytes(&self.data[start..end]))
                }
            }
            _ => Err(BitstringError::OutOfRange {
                start,
                end: start.saturating_add(len),
                size,
            }),
        }
    }

    /// Appends the bits of `other` to the bits of this bitstring.
    ///
    /// When this bitstring ends on a partial byte, the bytes of `other` are shifted
    /// into the free low bits of that byte, carrying into new trailing bytes.
    pub fn concat(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        if self.is_binary() {
            data.extend_from_slice(&self.data);
            data.extend_from_slice(&other.data);
            return Self::from_parts(data, other.bits);
        }

        let offset = self.bits;
        let (&last, init) = match self.data.split_last() {
            Some(split) => split,
            None => unreachable!("non-empty bitstring has a final byte"),
        };
        data.extend_from_slice(init);
        let mut carry = last;
        for &byte in other.data.iter() {
            data.push(carry | (byte >> offset));
            carry = byte << (8 - offset);
        }

        let total = offset + other.bits;
        if total > 8 {
            data.push(carry);
            Self::from_parts(data, total - 8)
        } else {
            Self::from_parts(data, total)
        }
    }

    /// Returns this bitstring repeated `n` times, as `binary:copy/2`
    pub fn copy(&self, n: usize) -> Self {
        if n == 0 || self.is_empty() {
            return Self::empty();
        }
        if self.is_binary() {
            return Self::from_bytes(self.data.repeat(n));
        }
        let mut result = self.clone();
        for _ in 1..n {
            result = result.concat(self);
        }
        result
    }

    /// Interprets this binary as an unsigned integer, as `binary:decode_unsigned/2`
    pub fn decode_unsigned(&self, endianness: Endianness) -> Result<BigUint, BitstringError> {
        self.ensure_binary()?;
        match endianness.resolve() {
            Endianness::Little => Ok(BigUint::from_bytes_le(&self.data)),
            _ => Ok(BigUint::from_bytes_be(&self.data)),
        }
    }

    /// Encodes an unsigned integer in the fewest bytes, as `binary:encode_unsigned/2`
    pub fn encode_unsigned(value: &BigUint, endianness: Endianness) -> Self {
        match endianness.resolve() {
            Endianness::Little => Self::from_bytes(value.to_bytes_le()),
            _ => Self::from_bytes(value.to_bytes_be()),
        }
    }

    fn printable_str(&self) -> Option<&str> {
        self.as_str()
            .filter(|s| !s.is_empty() && helpers::is_printable_str(s))
    }
}
impl Default for Bitstring {
    fn default() -> Self {
        Self::empty()
    }
}
impl From<&[u8]> for Bitstring {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}
impl From<Vec<u8>> for Bitstring {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}
impl From<&str> for Bitstring {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}
impl From<String> for Bitstring {
    fn from(s: String) -> Self {
        Self::from_bytes(s.into_bytes())
    }
}
impl Ord for Bitstring {
    /// Bits are compared in order from the most-significant bit of the first byte;
    /// when one bitstring is a prefix of the other, the shorter one is smaller.
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs_size = self.bit_size();
        let rhs_size = other.bit_size();
        let common = lhs_size.min(rhs_size);
        let full = common / 8;

        match self.data[..full].cmp(&other.data[..full]) {
            Ordering::Equal => (),
            ordering => return ordering,
        }

        let rem = (common % 8) as u8;
        if rem > 0 {
            let mask = bitmask_be(rem);
            let lhs = self.data[full] & mask;
            let rhs = other.data[full] & mask;
            match lhs.cmp(&rhs) {
                Ordering::Equal => (),
                ordering => return ordering,
            }
        }

        lhs_size.cmp(&rhs_size)
    }
}
impl PartialOrd for Bitstring {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_binary() {
            return match self.printable_str() {
                Some(s) => helpers::display_binary(s, f),
                None => helpers::display_bytes(self.data.iter().copied(), None, f),
            };
        }
        match self.data.split_last() {
            Some((last, init)) => {
                let trailing = (last >> (8 - self.bits), self.bits);
                helpers::display_bytes(init.iter().copied(), Some(trailing), f)
            }
            None => f.write_str("<<>>"),
        }
    }
}
impl fmt::Debug for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.printable_str() {
            Some(s) => write!(f, "{:?}", s),
            None => fmt::Display::fmt(self, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bits(b: &Bitstring) -> Vec<u8> {
        b.bits_iter().collect()
    }

    #[test]
    fn bitstring_masks_unused_bits() {
        let b = Bitstring::new(vec![255], 3).unwrap();
        assert_eq!(b.as_bytes(), &[0b1110_0000]);
        assert_eq!(b.bit_size(), 3);
        assert_eq!(bits(&b), vec![1, 1, 1]);
        assert_eq!(b, Bitstring::new(vec![0b1110_0101], 3).unwrap());
    }

    #[test]
    fn bitstring_rejects_invalid_bit_counts() {
        assert_eq!(
            Bitstring::new(vec![1], 0).unwrap_err(),
            BitstringError::InvalidBits(0)
        );
        assert_eq!(
            Bitstring::new(vec![1], 9).unwrap_err(),
            BitstringError::InvalidBits(9)
        );
    }

    #[test]
    fn bitstring_empty_is_binary() {
        let empty = Bitstring::new(Vec::new(), 3).unwrap();
        assert!(empty.is_binary());
        assert_eq!(empty, Bitstring::empty());
        assert_eq!(empty.bit_size(), 0);
        assert_eq!(empty.to_string(), "<<>>");
    }

    #[test]
    fn bitstring_byte_access_requires_alignment() {
        let bin = Bitstring::from("abc");
        assert_eq!(bin.byte_at(1), Ok(Some(b'b')));
        assert_eq!(bin.byte_at(3), Ok(None));
        assert_eq!(bin.first(), Ok(Some(b'a')));
        assert_eq!(bin.last(), Ok(Some(b'c')));

        let bits = Bitstring::new(vec![1, 2], 4).unwrap();
        assert_eq!(bits.byte_at(0), Err(BitstringError::Unaligned(4)));
        assert_eq!(bits.part(0, 1), Err(BitstringError::Unaligned(4)));
        assert!(bits.decode_unsigned(Endianness::Big).is_err());
    }

    #[test]
    fn bitstring_bitslice() {
        let bin = Bitstring::from_bytes(vec![0b1010_1100, 0b0101_0011]);
        let slice = bin.bitslice(2, 4).unwrap();
        assert_eq!(bits(&slice), vec![1, 0, 1, 1]);
        assert_eq!(slice.bits(), 4);

        let slice = bin.bitslice(4, 8).unwrap();
        assert!(slice.is_binary());
        assert_eq!(slice.as_bytes(), &[0b1100_0101]);

        let slice = bin.bitslice(12, 100).unwrap();
        assert_eq!(bits(&slice), vec![0, 0, 1, 1]);

        assert_eq!(bin.bitslice(16, 1), Some(Bitstring::empty()));
        assert_eq!(bin.bitslice(17, 1), None);
        assert_eq!(bin.bitslice_range(..3), bin.bitslice(0, 3));
        assert_eq!(bin.bitslice_range(3..=5), bin.bitslice(3, 3));
    }

    #[test]
    fn bitstring_concat_realigns() {
        let a = Bitstring::new(vec![0b1010_0000], 3).unwrap();
        let b = Bitstring::new(vec![0b1111_1111, 0b1100_0000], 2).unwrap();
        let c = a.concat(&b);
        assert_eq!(c.bit_size(), 13);
        assert_eq!(c.bits(), 5);
        assert_eq!(
            bits(&c),
            vec![1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]
        );

        let d = Bitstring::new(vec![0b1110_0000], 3).unwrap();
        let e = Bitstring::new(vec![0b1010_0000], 5).unwrap();
        let f = d.concat(&e);
        assert!(f.is_binary());
        assert_eq!(f.as_bytes(), &[0b1111_0100]);

        let bin = Bitstring::from("ab");
        assert_eq!(bin.concat(&Bitstring::from("c")), Bitstring::from("abc"));
        assert_eq!(bin.concat(&Bitstring::empty()), bin);
        assert_eq!(Bitstring::empty().concat(&a), a);
    }

    #[test]
    fn bitstring_ordering() {
        let a = Bitstring::from_bytes(vec![1, 2]);
        let b = Bitstring::from_bytes(vec![1, 2, 0]);
        let c = Bitstring::from_bytes(vec![1, 3]);
        let d = Bitstring::new(vec![1, 0b1000_0000], 1).unwrap();
        let e = Bitstring::new(vec![1, 0b0000_0000], 1).unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(e < d);
        assert!(a < d);
        assert!(Bitstring::empty() < e);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn bitstring_display() {
        assert_eq!(Bitstring::from("one").to_string(), "<<\"one\">>");
        assert_eq!(Bitstring::from("a\"b").to_string(), "<<\"a\\\"b\">>");
        assert_eq!(Bitstring::from_bytes(vec![1, 2, 3]).to_string(), "<<1,2,3>>");
        assert_eq!(
            Bitstring::new(vec![1, 2, 0b1010_0000], 3).unwrap().to_string(),
            "<<1,2,5:3>>"
        );
        assert_eq!(Bitstring::new(vec![0b1000_0000], 1).unwrap().to_string(), "<<1:1>>");
        assert_eq!(format!("{:?}", Bitstring::from("one")), "\"one\"");
        assert_eq!(format!("{:?}", Bitstring::from_bytes(vec![0])), "<<0>>");
    }

    #[test]
    fn bitstring_unsigned_codec() {
        let value = BigUint::from(0x0102_03u32);
        let big = Bitstring::encode_unsigned(&value, Endianness::Big);
        assert_eq!(big.as_bytes(), &[1, 2, 3]);
        let little = Bitstring::encode_unsigned(&value, Endianness::Little);
        assert_eq!(little.as_bytes(), &[3, 2, 1]);
        assert_eq!(big.decode_unsigned(Endianness::Big), Ok(value.clone()));
        assert_eq!(little.decode_unsigned(Endianness::Little), Ok(value));
        assert_eq!(
            Bitstring::encode_unsigned(&BigUint::from(0u8), Endianness::Big).as_bytes(),
            &[0]
        );
    }

    #[test]
    fn bitstring_part_and_copy() {
        let bin = Bitstring::from("hello");
        assert_eq!(bin.part(1, 3), Ok(Bitstring::from("ell")));
        assert_eq!(
            bin.part(3, 5),
            Err(BitstringError::OutOfRange {
                start: 3,
                end: 8,
                size: 5
            })
        );
        assert_eq!(Bitstring::from("ab").copy(3), Bitstring::from("ababab"));
        assert_eq!(bin.copy(0), Bitstring::empty());

        let bits = Bitstring::new(vec![0b1100_0000], 2).unwrap();
        let copied = bits.copy(4);
        assert!(copied.is_binary());
        assert_eq!(copied.as_bytes(), &[0b1111_1111]);
    }
}
