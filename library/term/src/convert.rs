use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use firefly_binary::Bitstring;
use firefly_number::{BigInt, BigUint, Float, Int};

use crate::{
    Atom, Export, Function, List, ListBuilder, Map, Pid, Port, Reference, Term, TermError, Tuple,
};

/// Converts a native value into the term it is represented by.
///
/// Conversion is idempotent: converting a [`Term`] returns it unchanged, so every
/// collection constructor can accept either terms or native values.
///
/// * `bool` becomes `true`/`false`, `()` and `None` become `[]`
/// * strings become UTF-8 binaries, use [`Bytes`] for arbitrary binaries
/// * vectors and slices become proper lists, native tuples become tuples
/// * `HashMap` and `BTreeMap` become maps
pub trait IntoTerm {
    fn into_term(self) -> Result<Term, TermError>;
}

/// Wraps raw bytes so they are converted to a binary rather than a list of integers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytes<B>(pub B);

/// Converts `value` to a term, see [`IntoTerm`]
#[inline]
pub fn coerce<T: IntoTerm>(value: T) -> Result<Term, TermError> {
    value.into_term()
}

impl IntoTerm for Term {
    #[inline(always)]
    fn into_term(self) -> Result<Term, TermError> {
        Ok(self)
    }
}
impl IntoTerm for &Term {
    #[inline]
    fn into_term(self) -> Result<Term, TermError> {
        Ok(self.clone())
    }
}
impl IntoTerm for () {
    #[inline]
    fn into_term(self) -> Result<Term, TermError> {
        Ok(Term::Nil)
    }
}
impl<T: IntoTerm> IntoTerm for Option<T> {
    fn into_term(self) -> Result<Term, TermError> {
        match self {
            None => Ok(Term::Nil),
            Some(value) => value.into_term(),
        }
    }
}

macro_rules! infallible_into_term {
    ($($ty:ty),*) => {
        $(
            impl IntoTerm for $ty {
                #[inline]
                fn into_term(self) -> Result<Term, TermError> {
                    Ok(self.into())
                }
            }
        )*
    };
}

infallible_into_term!(
    bool, Int, Float, Atom, Tuple, Map, List, Bitstring, Pid, Port, Reference, Export, Function
);

macro_rules! int_into_term {
    ($($ty:ty),*) => {
        $(
            impl IntoTerm for $ty {
                #[inline]
                fn into_term(self) -> Result<Term, TermError> {
                    Ok(Term::Int(Int::from(self)))
                }
            }
        )*
    };
}

int_into_term!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, BigInt, BigUint);

impl IntoTerm for f64 {
    fn into_term(self) -> Result<Term, TermError> {
        Ok(Term::Float(Float::new(self)?))
    }
}
impl IntoTerm for f32 {
    fn into_term(self) -> Result<Term, TermError> {
        Ok(Term::Float(Float::try_from(self)?))
    }
}
impl IntoTerm for &str {
    #[inline]
    fn into_term(self) -> Result<Term, TermError> {
        Ok(Term::binary(self))
    }
}
impl IntoTerm for String {
    #[inline]
    fn into_term(self) -> Result<Term, TermError> {
        Ok(Term::Bitstring(Bitstring::from(self)))
    }
}
impl<B: AsRef<[u8]>> IntoTerm for Bytes<B> {
    #[inline]
    fn into_term(self) -> Result<Term, TermError> {
        Ok(Term::Bitstring(Bitstring::from(self.0.as_ref())))
    }
}
impl<T: IntoTerm> IntoTerm for Vec<T> {
    fn into_term(self) -> Result<Term, TermError> {
        let mut builder = ListBuilder::with_capacity(self.len());
        for element in self {
            builder.push(element.into_term()?);
        }
        Ok(builder.finish().into())
    }
}
impl<T: Clone + IntoTerm> IntoTerm for &[T] {
    fn into_term(self) -> Result<Term, TermError> {
        let mut builder = ListBuilder::with_capacity(self.len());
        for element in self.iter().cloned() {
            builder.push(element.into_term()?);
        }
        Ok(builder.finish().into())
    }
}
impl<K, V, S> IntoTerm for HashMap<K, V, S>
where
    K: IntoTerm,
    V: IntoTerm,
    S: BuildHasher,
{
    fn into_term(self) -> Result<Term, TermError> {
        Map::from_pairs(self).map(Term::Map)
    }
}
impl<K: IntoTerm, V: IntoTerm> IntoTerm for BTreeMap<K, V> {
    fn into_term(self) -> Result<Term, TermError> {
        Map::from_pairs(self).map(Term::Map)
    }
}

macro_rules! tuple_into_term {
    ($($name:ident),+) => {
        impl<$($name: IntoTerm),+> IntoTerm for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_term(self) -> Result<Term, TermError> {
                let ($($name,)+) = self;
                Ok(Term::Tuple(Tuple::from_vec(vec![$($name.into_term()?),+])))
            }
        }
    };
}

tuple_into_term!(A);
tuple_into_term!(A, B);
tuple_into_term!(A, B, C);
tuple_into_term!(A, B, C, D);
tuple_into_term!(A, B, C, D, E);
tuple_into_term!(A, B, C, D, E, F);

impl Term {
    /// Converts a dynamically typed value to a term
    ///
    /// Only the types implementing [`IntoTerm`] directly are recognized, collections
    /// must be concretely typed.
    pub fn from_any(value: &dyn Any) -> Result<Self, TermError> {
        macro_rules! try_downcast {
            ($($ty:ty),*) => {
                $(
                    if let Some(v) = value.downcast_ref::<$ty>() {
                        return v.clone().into_term();
                    }
                )*
            };
        }

        try_downcast!(
            Term, bool, (), Int, Float, Atom, Tuple, Map, List, Bitstring, Pid, Port, Reference,
            Export, Function, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
            BigInt, BigUint, f32, f64, String, Vec<Term>, Bytes<Vec<u8>>
        );
        if let Some(s) = value.downcast_ref::<&'static str>() {
            return Ok(Term::binary(s));
        }
        Err(TermError::Unrecognized(unrecognized_type_name(value)))
    }
}

fn unrecognized_type_name(value: &dyn Any) -> &'static str {
    if value.is::<char>() {
        "char"
    } else {
        "unknown"
    }
}
