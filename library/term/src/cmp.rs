//! The standard Erlang term order.
//!
//! Terms of different kinds are ordered by kind:
//!
//! ```text
//! number < atom < reference < fun < port < pid < tuple < map < nil < list < bitstring
//! ```
//!
//! Terms of the same kind are ordered by a kind-specific comparison. The comparison
//! comes in two flavors, arithmetic (`==`, where `1 == 1.0`) and exact (`=:=`, where
//! integers sort before floats of equal value). Map keys are always compared exactly.
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::iter;

use rustc_hash::FxHasher;

use crate::{List, Map, Term, Tuple};

/// The kinds of term, in term order
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Kind {
    Number = 0,
    Atom,
    Reference,
    Fun,
    Port,
    Pid,
    Tuple,
    Map,
    Nil,
    List,
    Bitstring,
}
impl Kind {
    /// The position of this kind in the term order
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Compares two terms in term order, returning `-1`, `0` or `1`
///
/// Numbers of different types compare by value, so `compare(1, 1.0) == 0`.
pub fn compare(a: &Term, b: &Term) -> i32 {
    ordering_to_i32(cmp(a, b, false))
}

/// Like [`compare`], but integers sort before floats of equal value
pub fn compare_exact(a: &Term, b: &Term) -> i32 {
    ordering_to_i32(cmp(a, b, true))
}

#[inline]
fn ordering_to_i32(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// This trait provides the exact equality (`=:=`) of Erlang terms
pub trait ExactEq {
    fn exact_eq(&self, other: &Self) -> bool;

    #[inline]
    fn exact_ne(&self, other: &Self) -> bool {
        !self.exact_eq(other)
    }
}

pub(crate) fn cmp(a: &Term, b: &Term, exact: bool) -> Ordering {
    match (a, b) {
        (Term::Int(x), Term::Int(y)) => x.cmp(y),
        (Term::Float(x), Term::Float(y)) => x.cmp(y),
        (Term::Int(x), Term::Float(y)) => match y.cmp_int(x).reverse() {
            Ordering::Equal if exact => Ordering::Less,
            ordering => ordering,
        },
        (Term::Float(x), Term::Int(y)) => match x.cmp_int(y) {
            Ordering::Equal if exact => Ordering::Greater,
            ordering => ordering,
        },
        (Term::Atom(x), Term::Atom(y)) => x.cmp(y),
        (Term::Reference(x), Term::Reference(y)) => x.cmp(y),
        (Term::Function(x), Term::Function(y)) => x.cmp_with(y, exact),
        (Term::Export(x), Term::Export(y)) => x.cmp(y),
        // Local funs sort before external funs
        (Term::Function(_), Term::Export(_)) => Ordering::Less,
        (Term::Export(_), Term::Function(_)) => Ordering::Greater,
        (Term::Port(x), Term::Port(y)) => x.cmp(y),
        (Term::Pid(x), Term::Pid(y)) => x.cmp(y),
        (Term::Tuple(x), Term::Tuple(y)) => cmp_tuples(x, y, exact),
        (Term::Map(x), Term::Map(y)) => cmp_maps(x, y, exact),
        (Term::Nil, Term::Nil) => Ordering::Equal,
        (Term::Cons(_), Term::Cons(_)) => cmp_lists(a, b, exact),
        (Term::Bitstring(x), Term::Bitstring(y)) => x.cmp(y),
        _ => a.kind().cmp(&b.kind()),
    }
}

/// Compares sequences elementwise, returning the first difference
pub(crate) fn cmp_seq<'a, I, J>(a: I, b: J, exact: bool) -> Ordering
where
    I: IntoIterator<Item = &'a Term>,
    J: IntoIterator<Item = &'a Term>,
{
    for (x, y) in iter::zip(a, b) {
        match cmp(x, y, exact) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }
    Ordering::Equal
}

fn cmp_tuples(a: &Tuple, b: &Tuple, exact: bool) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    a.len()
        .cmp(&b.len())
        .then_with(|| cmp_seq(a.iter(), b.iter(), exact))
}

fn cmp_maps(a: &Map, b: &Map, exact: bool) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    a.len().cmp(&b.len()).then_with(|| {
        let a = a.sorted_pairs();
        let b = b.sorted_pairs();
        cmp_seq(a.iter().map(|(k, _)| *k), b.iter().map(|(k, _)| *k), true)
            .then_with(|| cmp_seq(a.iter().map(|(_, v)| *v), b.iter().map(|(_, v)| *v), exact))
    })
}

fn cmp_lists(mut a: &Term, mut b: &Term, exact: bool) -> Ordering {
    loop {
        match (a, b) {
            (Term::Cons(x), Term::Cons(y)) => {
                if std::sync::Arc::ptr_eq(x, y) {
                    return Ordering::Equal;
                }
                match cmp(x.head(), y.head(), exact) {
                    Ordering::Equal => {
                        a = x.tail();
                        b = y.tail();
                    }
                    ordering => return ordering,
                }
            }
            // Either list has ended, or one of them is improper
            _ => return cmp(a, b, exact),
        }
    }
}

impl ExactEq for Term {
    #[inline]
    fn exact_eq(&self, other: &Self) -> bool {
        cmp(self, other, true) == Ordering::Equal
    }
}
impl Eq for Term {}
impl PartialEq for Term {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        cmp(self, other, false) == Ordering::Equal
    }
}
impl PartialOrd for Term {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Term {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        cmp(self, other, false)
    }
}

/// Hashing is consistent with both `==` and `=:=`, so integral floats hash like integers
impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.kind().rank());
        match self {
            Self::Int(i) => i.hash(state),
            Self::Float(f) => match f.to_integer() {
                Some(i) => i.hash(state),
                None => f.hash(state),
            },
            Self::Atom(a) => a.hash(state),
            Self::Reference(r) => r.hash(state),
            Self::Function(fun) => {
                state.write_u8(0);
                fun.hash(state);
            }
            Self::Export(export) => {
                state.write_u8(1);
                export.hash(state);
            }
            Self::Port(port) => port.hash(state),
            Self::Pid(pid) => pid.hash(state),
            Self::Tuple(t) => t.hash(state),
            Self::Map(m) => m.hash(state),
            Self::Nil => (),
            Self::Cons(_) => {
                let mut term = self;
                while let Self::Cons(cons) = term {
                    cons.head().hash(state);
                    term = cons.tail();
                }
                // Folds in `[]` for proper lists, and the tail of improper ones
                term.hash(state);
            }
            Self::Bitstring(b) => b.hash(state),
        }
    }
}

impl ExactEq for Tuple {
    #[inline]
    fn exact_eq(&self, other: &Self) -> bool {
        cmp_tuples(self, other, true) == Ordering::Equal
    }
}
impl Eq for Tuple {}
impl PartialEq for Tuple {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        cmp_tuples(self, other, false) == Ordering::Equal
    }
}
impl PartialOrd for Tuple {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Tuple {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_tuples(self, other, false)
    }
}
impl Hash for Tuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for element in self.iter() {
            element.hash(state);
        }
    }
}

impl ExactEq for Map {
    #[inline]
    fn exact_eq(&self, other: &Self) -> bool {
        cmp_maps(self, other, true) == Ordering::Equal
    }
}
impl Eq for Map {}
impl PartialEq for Map {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        cmp_maps(self, other, false) == Ordering::Equal
    }
}
impl PartialOrd for Map {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Map {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_maps(self, other, false)
    }
}
/// Entries are hashed independently and combined commutatively, as iteration order is
/// determined by the shape of the trie
impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.iter().fold(0u64, |acc, (key, value)| {
            let mut hasher = FxHasher::default();
            key.hash(&mut hasher);
            value.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        state.write_usize(self.len());
        state.write_u64(combined);
    }
}

impl ExactEq for List {
    fn exact_eq(&self, other: &Self) -> bool {
        cmp(&self.to_term(), &other.to_term(), true) == Ordering::Equal
    }
}
impl Eq for List {}
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        cmp(&self.to_term(), &other.to_term(), false) == Ordering::Equal
    }
}
impl PartialOrd for List {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for List {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp(&self.to_term(), &other.to_term(), false)
    }
}
impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_term().hash(state)
    }
}
