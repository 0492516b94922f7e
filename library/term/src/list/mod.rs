mod builder;
pub mod iter;

pub use self::builder::ListBuilder;
pub use self::iter::{Cells, Iter};

use core::fmt::{self, Write};
use core::hash::{Hash, Hasher};
use core::mem;
use std::sync::{Arc, OnceLock};

use firefly_binary::helpers::{is_printable_char, write_escaped};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{ExactEq, Int, IntoTerm, OneBasedIndex, Term, TermError, Tuple};

/// Produced by operations which require a proper list, holding the tail of the improper one
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("improper list with tail {tail}")]
pub struct ImproperListError {
    pub tail: Term,
}

/// A single cell of a linked list
///
/// Whether the list starting at this cell is improper is decided when the cell is
/// created, and never changes.
pub struct Cons {
    head: Term,
    tail: Term,
    improper: bool,
    len: OnceLock<usize>,
}
impl Cons {
    pub fn new(head: Term, tail: Term) -> Self {
        let improper = match &tail {
            Term::Nil => false,
            Term::Cons(cons) => cons.improper,
            _ => true,
        };
        Self {
            head,
            tail,
            improper,
            len: OnceLock::new(),
        }
    }

    #[inline]
    pub fn head(&self) -> &Term {
        &self.head
    }

    #[inline]
    pub fn tail(&self) -> &Term {
        &self.tail
    }

    #[inline]
    pub fn is_improper(&self) -> bool {
        self.improper
    }

    /// The number of cells in the chain starting at this cell, computed once
    fn count(&self) -> usize {
        *self.len.get_or_init(|| {
            let mut count = 1;
            let mut tail = &self.tail;
            while let Term::Cons(next) = tail {
                if let Some(len) = next.len.get() {
                    return count + len;
                }
                count += 1;
                tail = &next.tail;
            }
            count
        })
    }
}
impl Drop for Cons {
    fn drop(&mut self) {
        // Unlink uniquely owned cells one at a time, so long lists don't overflow the stack
        let mut tail = mem::replace(&mut self.tail, Term::Nil);
        while let Term::Cons(cell) = tail {
            match Arc::try_unwrap(cell) {
                Ok(mut cell) => tail = mem::replace(&mut cell.tail, Term::Nil),
                Err(_) => break,
            }
        }
    }
}

/// An immutable linked list, either `[]` or a chain of cons cells
#[derive(Clone, Default)]
pub enum List {
    #[default]
    Nil,
    Cons(Arc<Cons>),
}
impl List {
    /// Creates a proper list from any sequence of values convertible to terms
    pub fn new<I, T>(elements: I) -> Result<Self, TermError>
    where
        I: IntoIterator<Item = T>,
        T: IntoTerm,
    {
        let mut builder = ListBuilder::new();
        for element in elements {
            builder.push(element.into_term()?);
        }
        Ok(builder.finish())
    }

    pub fn from_vec(elements: Vec<Term>) -> Self {
        let mut builder = ListBuilder::with_capacity(elements.len());
        builder.extend(elements);
        builder.finish()
    }

    /// Creates a list of `elements` terminated by `tail`, which is improper unless `tail` is a list
    pub fn improper<I, T, U>(elements: I, tail: U) -> Result<Self, TermError>
    where
        I: IntoIterator<Item = T>,
        T: IntoTerm,
        U: IntoTerm,
    {
        let mut builder = ListBuilder::new();
        for element in elements {
            builder.push(element.into_term()?);
        }
        builder.finish_with_tail(tail.into_term()?)
    }

    /// Creates the cell `[head | tail]`
    pub fn cons(head: Term, tail: Term) -> Self {
        Self::Cons(Arc::new(Cons::new(head, tail)))
    }

    /// Creates a charlist from the characters of `s`
    pub fn from_chars(s: &str) -> Self {
        s.chars().map(|c| Term::Int(Int::from(c))).collect()
    }

    /// Returns a list with `head` in front of this one, sharing this list as its tail
    pub fn prepend(&self, head: Term) -> Self {
        Self::cons(head, self.to_term())
    }

    pub fn to_term(&self) -> Term {
        Term::from(self.clone())
    }

    #[inline]
    fn cell(&self) -> Option<&Cons> {
        match self {
            Self::Nil => None,
            Self::Cons(cons) => Some(&**cons),
        }
    }

    /// The first element, or `None` for `[]`
    pub fn head(&self) -> Option<&Term> {
        self.cell().map(Cons::head)
    }

    /// Everything after the first element; the tail of `[]` is `[]`
    pub fn tail(&self) -> Term {
        match self {
            Self::Nil => Term::Nil,
            Self::Cons(cons) => cons.tail.clone(),
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_nil()
    }

    #[inline]
    pub fn is_improper(&self) -> bool {
        self.cell().map_or(false, Cons::is_improper)
    }

    #[inline]
    pub fn is_proper(&self) -> bool {
        !self.is_improper()
    }

    /// Iterates over the elements, failing at the end of an improper list
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.cell())
    }

    /// Iterates over the cells of this list, including those of an improper list
    pub fn cells(&self) -> Cells<'_> {
        Cells::new(self.cell())
    }

    /// The tail of the last cell, i.e. `[]` for proper lists
    fn last_tail(&self) -> Option<&Term> {
        self.cells().last().map(Cons::tail)
    }

    fn check_proper(&self) -> Result<(), ImproperListError> {
        if !self.is_improper() {
            return Ok(());
        }
        let tail = self.last_tail().cloned().unwrap_or(Term::Nil);
        Err(ImproperListError { tail })
    }

    /// Iterates over the heads of a list already known to be proper
    fn heads(&self) -> impl Iterator<Item = &Term> + '_ {
        self.cells().map(Cons::head)
    }

    /// The number of elements in a proper list
    pub fn size(&self) -> Result<usize, ImproperListError> {
        self.check_proper()?;
        Ok(self.cell().map_or(0, Cons::count))
    }

    #[inline]
    pub fn len(&self) -> Result<usize, ImproperListError> {
        self.size()
    }

    pub fn map<F>(&self, fun: F) -> Result<Self, ImproperListError>
    where
        F: FnMut(&Term) -> Term,
    {
        self.check_proper()?;
        let mut builder = ListBuilder::new();
        builder.extend(self.heads().map(fun));
        Ok(builder.finish())
    }

    pub fn select<F>(&self, mut predicate: F) -> Result<Self, ImproperListError>
    where
        F: FnMut(&Term) -> bool,
    {
        self.check_proper()?;
        let mut builder = ListBuilder::new();
        builder.extend(self.heads().filter(|t| predicate(t)).cloned());
        Ok(builder.finish())
    }

    pub fn reject<F>(&self, mut predicate: F) -> Result<Self, ImproperListError>
    where
        F: FnMut(&Term) -> bool,
    {
        self.select(|t| !predicate(t))
    }

    /// Returns this list followed by `tail`, as `++` does
    ///
    /// The result is improper when `tail` is not a list. An improper list is first made
    /// proper with [`List::to_proper_list`]. Appending a non-list to `[]` is an error.
    pub fn append(&self, tail: Term) -> Result<Self, TermError> {
        if self.is_nil() {
            return ListBuilder::new().finish_with_tail(tail);
        }
        let proper = self.to_proper_list();
        let mut builder = ListBuilder::new();
        builder.extend(proper.heads().cloned());
        builder.finish_with_tail(tail)
    }

    /// Flattens nested proper lists into a single list
    pub fn flatten(&self) -> Result<Self, ImproperListError> {
        fn flatten_into(list: &List, builder: &mut ListBuilder) -> Result<(), ImproperListError> {
            list.check_proper()?;
            for element in list.heads() {
                match element.as_list() {
                    Some(nested) => flatten_into(&nested, builder)?,
                    None => builder.push(element.clone()),
                }
            }
            Ok(())
        }

        let mut builder = ListBuilder::new();
        flatten_into(self, &mut builder)?;
        Ok(builder.finish())
    }

    /// Returns the first `n` elements
    pub fn take(&self, n: usize) -> Result<Self, ImproperListError> {
        if n >= self.size()? {
            return Ok(self.clone());
        }
        let mut builder = ListBuilder::with_capacity(n);
        builder.extend(self.heads().take(n).cloned());
        Ok(builder.finish())
    }

    /// Returns the list after the first `n` elements, sharing it with this list
    pub fn drop(&self, n: usize) -> Result<Self, ImproperListError> {
        self.check_proper()?;
        if n == 0 {
            return Ok(self.clone());
        }
        Ok(self
            .cells()
            .nth(n - 1)
            .and_then(|cell| cell.tail().as_list())
            .unwrap_or_default())
    }

    /// Removes all but the first occurrence of each element, using exact equality
    pub fn uniq(&self) -> Result<Self, ImproperListError> {
        struct ExactKey<'a>(&'a Term);
        impl PartialEq for ExactKey<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.0.exact_eq(other.0)
            }
        }
        impl Eq for ExactKey<'_> {}
        impl Hash for ExactKey<'_> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state)
            }
        }

        self.check_proper()?;
        let mut seen = FxHashSet::default();
        let mut builder = ListBuilder::new();
        for element in self.heads() {
            if seen.insert(ExactKey(element)) {
                builder.push(element.clone());
            }
        }
        Ok(builder.finish())
    }

    pub fn reverse(&self) -> Result<Self, ImproperListError> {
        self.check_proper()?;
        Ok(self
            .heads()
            .fold(Self::Nil, |reversed, head| reversed.prepend(head.clone())))
    }

    /// The last element of a proper list
    pub fn last(&self) -> Result<Option<&Term>, ImproperListError> {
        self.check_proper()?;
        Ok(self.heads().last())
    }

    /// The last element, where the last element of an improper list is its tail
    pub fn last_allow_improper(&self) -> Option<&Term> {
        let last = self.cells().last()?;
        match last.tail() {
            Term::Nil => Some(last.head()),
            tail => Some(tail),
        }
    }

    /// The element at 0-based `index`
    pub fn at(&self, index: usize) -> Result<Option<&Term>, ImproperListError> {
        self.check_proper()?;
        Ok(self.heads().nth(index))
    }

    /// Returns a copy of this list with its elements in term order
    pub fn sort(&self) -> Result<Self, ImproperListError> {
        let mut elements = self.to_vec()?;
        elements.sort();
        Ok(Self::from_vec(elements))
    }

    /// Returns a proper list, where the tail of an improper list becomes the last element
    pub fn to_proper_list(&self) -> Self {
        if self.is_proper() {
            return self.clone();
        }
        let mut builder = ListBuilder::new();
        for cell in self.cells() {
            builder.push(cell.head().clone());
            if !cell.tail().is_list() {
                builder.push(cell.tail().clone());
            }
        }
        builder.finish()
    }

    pub fn to_vec(&self) -> Result<Vec<Term>, ImproperListError> {
        self.check_proper()?;
        Ok(self.heads().cloned().collect())
    }

    /// Finds the first tuple whose element at `position` is equal to `key`, like `lists:keyfind/3`
    pub fn keyfind(
        &self,
        key: &Term,
        position: OneBasedIndex,
    ) -> Result<Option<&Tuple>, ImproperListError> {
        self.check_proper()?;
        Ok(self.heads().find_map(|element| match element {
            Term::Tuple(tuple) if tuple.get_element(position) == Some(key) => Some(tuple),
            _ => None,
        }))
    }

    /// Returns true if this is a non-empty proper list of printable characters
    pub fn is_printable_string(&self) -> bool {
        self.printable_string().is_some()
    }

    fn printable_string(&self) -> Option<String> {
        if self.is_nil() || self.is_improper() {
            return None;
        }
        self.heads()
            .map(|element| match element {
                Term::Int(i) => i.to_char().filter(|c| is_printable_char(*c)),
                _ => None,
            })
            .collect()
    }
}

macro_rules! cxr {
    ($($name:ident: $($op:ident)+;)+) => {
        /// The `c[ad]+r` accessors. `a` takes the head and `d` the tail, applied from right
        /// to left, so `cadr` is the second element. Returns `None` if a head is taken from
        /// something other than a non-empty list.
        impl List {
            $(
                pub fn $name(&self) -> Option<Term> {
                    let term = self.to_term();
                    $(let term = cxr_step(&term, Cxr::$op)?;)+
                    Some(term)
                }
            )+
        }
    };
}

#[derive(Copy, Clone)]
enum Cxr {
    A,
    D,
}

fn cxr_step(term: &Term, op: Cxr) -> Option<Term> {
    match (term, op) {
        (Term::Cons(cons), Cxr::A) => Some(cons.head().clone()),
        (Term::Cons(cons), Cxr::D) => Some(cons.tail().clone()),
        (Term::Nil, Cxr::D) => Some(Term::Nil),
        _ => None,
    }
}

// Operations are listed in the order they are applied
cxr! {
    car: A;
    cdr: D;
    caar: A A;
    cadr: D A;
    cdar: A D;
    cddr: D D;
    caaar: A A A;
    caadr: D A A;
    cadar: A D A;
    caddr: D D A;
    cdaar: A A D;
    cdadr: D A D;
    cddar: A D D;
    cdddr: D D D;
}

impl FromIterator<Term> for List {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut builder = ListBuilder::new();
        builder.extend(iter);
        builder.finish()
    }
}
impl TryFrom<Term> for List {
    type Error = TermError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        match term {
            Term::Nil => Ok(Self::Nil),
            Term::Cons(cons) => Ok(Self::Cons(cons)),
            other => Err(TermError::NotAList(other.to_string())),
        }
    }
}
impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char('[')?;
        for (i, cell) in self.cells().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", cell.head())?;
            if !cell.tail().is_list() {
                write!(f, " | {:?}", cell.tail())?;
            }
        }
        f.write_char(']')
    }
}
/// Renders the list as an Erlang literal, printing charlists as strings
impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(s) = self.printable_string() {
            f.write_char('"')?;
            write_escaped(f, &s, '"')?;
            return f.write_char('"');
        }
        f.write_char('[')?;
        for (i, cell) in self.cells().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{}", cell.head())?;
            if !cell.tail().is_list() {
                write!(f, "|{}", cell.tail())?;
            }
        }
        f.write_char(']')
    }
}
