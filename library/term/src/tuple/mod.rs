mod trie;

pub use self::trie::{Iter, BRANCH_BITS, BRANCH_FACTOR};

use core::fmt;

use self::trie::Trie;

use crate::{IndexError, IntoTerm, List, TermError, Term, TupleIndex};

/// A fixed-size, immutable sequence of terms
///
/// Tuples are backed by a persistent trie, so operations which produce a modified copy of
/// a tuple share all of the structure not on the path to the modified elements.
#[derive(Clone, Default)]
pub struct Tuple(Trie<Term>);
impl Tuple {
    /// Creates a tuple from any sequence of values convertible to terms
    pub fn new<I, T>(elements: I) -> Result<Self, TermError>
    where
        I: IntoIterator<Item = T>,
        T: IntoTerm,
    {
        let elements = elements
            .into_iter()
            .map(IntoTerm::into_term)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_vec(elements))
    }

    #[inline]
    pub fn from_vec(elements: Vec<Term>) -> Self {
        Self(Trie::from_vec(elements))
    }

    /// The empty tuple, `{}`
    #[inline]
    pub fn empty() -> Self {
        Self(Trie::new())
    }

    /// Returns the number of elements in this tuple
    #[inline]
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if both tuples are backed by the same trie
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Returns the element at 0-based index `index`, if in bounds
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Term> {
        self.0.get(index)
    }

    /// Like `get`, but with either 0 or 1-based indexing
    #[inline]
    pub fn get_element<I: TupleIndex>(&self, index: I) -> Option<&Term> {
        self.get(index.into())
    }

    /// Like `get`, but a missing element is an error
    pub fn fetch(&self, index: usize) -> Result<&Term, IndexError> {
        self.get(index).ok_or_else(|| IndexError::new(index, self.len()))
    }

    /// Returns a copy of this tuple with the element at `index` replaced
    ///
    /// An index equal to the arity appends `value` instead; any larger index is an error.
    pub fn put(&self, index: usize, value: Term) -> Result<Self, IndexError> {
        let len = self.len();
        if index < len {
            Ok(self.0.update(index, value).map(Self).unwrap_or_else(|| self.clone()))
        } else if index == len {
            Ok(self.append_element(value))
        } else {
            Err(IndexError::new(index, len))
        }
    }

    /// Like `put`, but with either 0 or 1-based indexing, and no appending
    pub fn set_element<I: TupleIndex>(&self, index: I, value: Term) -> Result<Self, IndexError> {
        let index = index.into();
        self.0
            .update(index, value)
            .map(Self)
            .ok_or_else(|| IndexError::new(index, self.len()))
    }

    /// Returns a copy of this tuple with `value` added to the end
    #[inline]
    pub fn append_element(&self, value: Term) -> Self {
        Self(self.0.push(value))
    }

    /// Returns a copy of this tuple with `value` inserted before the element at `index`
    pub fn insert_element<I: TupleIndex>(&self, index: I, value: Term) -> Result<Self, IndexError> {
        let index = index.into();
        let len = self.len();
        if index > len {
            return Err(IndexError::new(index, len));
        }
        let mut suffix = Vec::with_capacity(len - index + 1);
        suffix.push(value);
        suffix.extend(self.0.slice(index, len - index));
        Ok(Self(self.0.replace_suffix(index, suffix)))
    }

    /// Returns a copy of this tuple without the element at `index`
    pub fn delete_element<I: TupleIndex>(&self, index: I) -> Result<Self, IndexError> {
        let index = index.into();
        let len = self.len();
        if index >= len {
            return Err(IndexError::new(index, len));
        }
        let suffix = self.0.slice(index + 1, len - index - 1);
        Ok(Self(self.0.replace_suffix(index, suffix)))
    }

    /// Returns a tuple of the elements of this tuple followed by those of `other`
    pub fn concat(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        Self(self.0.extend(other.iter().cloned()))
    }

    /// Returns the tuple of up to `len` elements starting at `from`
    ///
    /// Returns `None` if `from` is past the end of the tuple.
    pub fn slice(&self, from: usize, len: usize) -> Option<Self> {
        if from > self.len() {
            return None;
        }
        if from == 0 && len >= self.len() {
            return Some(self.clone());
        }
        Some(Self::from_vec(self.0.slice(from, len)))
    }

    #[inline]
    pub fn first(&self) -> Option<&Term> {
        self.get(0)
    }

    #[inline]
    pub fn last(&self) -> Option<&Term> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, Term> {
        self.0.iter()
    }

    pub fn map<F>(&self, fun: F) -> Self
    where
        F: FnMut(&Term) -> Term,
    {
        Self::from_vec(self.iter().map(fun).collect())
    }

    pub fn select<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Term) -> bool,
    {
        Self::from_vec(self.iter().filter(|t| predicate(t)).cloned().collect())
    }

    pub fn reverse(&self) -> Self {
        Self::from_vec(self.iter().rev().cloned().collect())
    }

    /// Returns a copy of this tuple with its elements in term order
    pub fn sort(&self) -> Self {
        let mut elements = self.to_vec();
        elements.sort();
        Self::from_vec(elements)
    }

    /// Returns a proper list of the elements of this tuple
    pub fn to_list(&self) -> List {
        List::from_vec(self.to_vec())
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<Term> {
        self.0.to_vec()
    }
}
impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Term;
    type IntoIter = Iter<'a, Term>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
impl FromIterator<Term> for Tuple {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
impl From<Vec<Term>> for Tuple {
    #[inline]
    fn from(elements: Vec<Term>) -> Self {
        Self::from_vec(elements)
    }
}
impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("{")?;
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", element)?;
        }
        f.write_str("}")
    }
}
impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("{")?;
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str("}")
    }
}
