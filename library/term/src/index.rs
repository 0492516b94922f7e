use core::cmp;

use thiserror::Error;

use crate::Term;

/// This error type is produced when an index is invalid, either due
/// to type or range
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    #[error("invalid index: bad argument")]
    BadArgument,
    #[error("invalid index {index}, exceeds max length of {len}")]
    OutOfBounds { len: usize, index: usize },
}
impl IndexError {
    pub fn new(index: usize, len: usize) -> Self {
        Self::OutOfBounds { len, index }
    }
}
impl From<core::num::TryFromIntError> for IndexError {
    fn from(_: core::num::TryFromIntError) -> Self {
        Self::BadArgument
    }
}

/// A marker trait for index types which can address tuple elements
pub trait TupleIndex: Copy + Into<usize> {}

impl TupleIndex for usize {}

/// Represents indices which start at 1 and progress upwards, as used by `element/2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OneBasedIndex(usize);
impl OneBasedIndex {
    #[inline]
    pub fn new(i: usize) -> Result<Self, IndexError> {
        if i > 0 {
            Ok(Self(i))
        } else {
            Err(IndexError::BadArgument)
        }
    }
}
impl TupleIndex for OneBasedIndex {}
impl Default for OneBasedIndex {
    fn default() -> Self {
        Self(1)
    }
}
impl TryFrom<i64> for OneBasedIndex {
    type Error = IndexError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n.try_into()?)
    }
}
impl TryFrom<&Term> for OneBasedIndex {
    type Error = IndexError;

    fn try_from(term: &Term) -> Result<Self, Self::Error> {
        match term {
            Term::Int(i) => Self::new(i.to_usize().ok_or(IndexError::BadArgument)?),
            _ => Err(IndexError::BadArgument),
        }
    }
}
impl From<OneBasedIndex> for usize {
    #[inline(always)]
    fn from(i: OneBasedIndex) -> usize {
        i.0 - 1
    }
}
impl PartialEq<usize> for OneBasedIndex {
    #[inline]
    fn eq(&self, other: &usize) -> bool {
        (self.0 - 1) == *other
    }
}
impl PartialOrd<usize> for OneBasedIndex {
    #[inline]
    fn partial_cmp(&self, other: &usize) -> Option<cmp::Ordering> {
        (self.0 - 1).partial_cmp(other)
    }
}

/// Represents indices which start at 0 and progress upwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ZeroBasedIndex(usize);
impl ZeroBasedIndex {
    #[inline(always)]
    pub fn new(i: usize) -> Self {
        Self(i)
    }
}
impl TupleIndex for ZeroBasedIndex {}
impl TryFrom<i64> for ZeroBasedIndex {
    type Error = IndexError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Ok(Self(n.try_into()?))
    }
}
impl TryFrom<&Term> for ZeroBasedIndex {
    type Error = IndexError;

    fn try_from(term: &Term) -> Result<Self, Self::Error> {
        match term {
            Term::Int(i) => Ok(Self(i.to_usize().ok_or(IndexError::BadArgument)?)),
            _ => Err(IndexError::BadArgument),
        }
    }
}
impl From<OneBasedIndex> for ZeroBasedIndex {
    #[inline]
    fn from(i: OneBasedIndex) -> ZeroBasedIndex {
        Self(i.0 - 1)
    }
}
impl From<usize> for ZeroBasedIndex {
    #[inline(always)]
    fn from(n: usize) -> Self {
        Self(n)
    }
}
impl From<ZeroBasedIndex> for usize {
    #[inline(always)]
    fn from(i: ZeroBasedIndex) -> usize {
        i.0
    }
}
impl PartialEq<usize> for ZeroBasedIndex {
    #[inline]
    fn eq(&self, other: &usize) -> bool {
        self.0 == *other
    }
}
impl PartialEq<OneBasedIndex> for ZeroBasedIndex {
    #[inline]
    fn eq(&self, other: &OneBasedIndex) -> bool {
        self.0 == other.0 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firefly_number::Int;

    #[test]
    fn one_based_index_conversions() {
        assert_eq!(OneBasedIndex::new(0), Err(IndexError::BadArgument));
        let one = OneBasedIndex::new(1).unwrap();
        assert_eq!(usize::from(one), 0);
        assert_eq!(ZeroBasedIndex::from(one), ZeroBasedIndex::new(0));
        assert_eq!(OneBasedIndex::try_from(-1i64), Err(IndexError::BadArgument));
        assert_eq!(
            OneBasedIndex::try_from(&Term::Int(Int::new(3))),
            Ok(OneBasedIndex::new(3).unwrap())
        );
        assert_eq!(
            OneBasedIndex::try_from(&Term::Nil),
            Err(IndexError::BadArgument)
        );
    }

    #[test]
    fn zero_based_index_conversions() {
        assert_eq!(ZeroBasedIndex::try_from(2i64), Ok(ZeroBasedIndex::new(2)));
        assert_eq!(ZeroBasedIndex::try_from(-2i64), Err(IndexError::BadArgument));
        assert!(ZeroBasedIndex::new(0) == OneBasedIndex::new(1).unwrap());
    }
}
