//! Immutable Erlang terms.
//!
//! Every value in this crate is immutable once constructed. Operations which "modify"
//! a term return a new term, sharing as much of the original structure as possible:
//!
//! * [`Tuple`] is backed by a 32-way persistent trie, so updating one element copies
//!   only the nodes on the path to that element.
//! * [`Map`] is backed by a hash array mapped trie keyed by exact term equality.
//! * [`List`] is a singly linked list of reference-counted cons cells, which may be
//!   improper (i.e. terminated by something other than `[]`).
//!
//! All terms are totally ordered using Erlang's term order, see [`compare`].
pub mod atom;
mod cmp;
mod convert;
mod error;
mod fun;
mod index;
pub mod list;
pub mod map;
mod pid;
mod port;
mod reference;
mod term;
pub mod tuple;

pub use self::atom::{Atom, AtomError, MAX_ATOM_CHARACTERS};
pub use self::cmp::{compare, compare_exact, ExactEq, Kind};
pub use self::convert::{coerce, Bytes, IntoTerm};
pub use self::error::TermError;
pub use self::fun::{Export, Function};
pub use self::index::{IndexError, OneBasedIndex, TupleIndex, ZeroBasedIndex};
pub use self::list::{Cons, ImproperListError, List, ListBuilder};
pub use self::map::{Map, MapError};
pub use self::pid::Pid;
pub use self::port::Port;
pub use self::reference::{Reference, ReferenceError, ReferenceFormat};
pub use self::term::Term;
pub use self::tuple::Tuple;

pub use firefly_binary::{Bitstring, BitstringError};
pub use firefly_number::{BigInt, Float, FloatError, Int};

/// Builds a [`Tuple`] from a list of values convertible with [`IntoTerm`].
///
/// Evaluates to `Result<Tuple, TermError>`.
#[macro_export]
macro_rules! tuple {
    () => {
        ::core::result::Result::<$crate::Tuple, $crate::TermError>::Ok($crate::Tuple::empty())
    };
    ($($value:expr),+ $(,)?) => {
        (|| -> ::core::result::Result<$crate::Tuple, $crate::TermError> {
            Ok($crate::Tuple::from_vec(vec![$($crate::IntoTerm::into_term($value)?),+]))
        })()
    };
}

/// Builds a proper [`List`] from a list of values convertible with [`IntoTerm`].
///
/// Evaluates to `Result<List, TermError>`.
#[macro_export]
macro_rules! list {
    () => {
        ::core::result::Result::<$crate::List, $crate::TermError>::Ok($crate::List::Nil)
    };
    ($($value:expr),+ $(,)?) => {
        (|| -> ::core::result::Result<$crate::List, $crate::TermError> {
            Ok($crate::List::from_vec(vec![$($crate::IntoTerm::into_term($value)?),+]))
        })()
    };
}

/// Builds a [`Map`] from `key => value` pairs convertible with [`IntoTerm`].
///
/// Evaluates to `Result<Map, TermError>`.
#[macro_export]
macro_rules! map {
    () => {
        ::core::result::Result::<$crate::Map, $crate::TermError>::Ok($crate::Map::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        (|| -> ::core::result::Result<$crate::Map, $crate::TermError> {
            let mut pairs = ::std::vec::Vec::new();
            $(
                pairs.push(($crate::IntoTerm::into_term($key)?, $crate::IntoTerm::into_term($value)?));
            )+
            Ok($crate::Map::from_terms(pairs))
        })()
    };
}
