use core::fmt;
use std::sync::Arc;

use firefly_binary::Bitstring;
use firefly_number::{Float, Int};

use crate::cmp::Kind;
use crate::{Atom, AtomError, Cons, Export, Function, List, Map, Pid, Port, Reference, Tuple};

/// An immutable Erlang term
///
/// Cloning a term is cheap: compound values are reference-counted and never mutated once
/// constructed, so clones share all of their structure.
///
/// `PartialEq` is Erlang's `==`, under which `1 == 1.0`. Use [`ExactEq`](crate::ExactEq)
/// for `=:=`. `Ord` is the standard Erlang term order.
#[derive(Clone)]
pub enum Term {
    Int(Int),
    Float(Float),
    Atom(Atom),
    Reference(Arc<Reference>),
    Function(Arc<Function>),
    Export(Arc<Export>),
    Port(Arc<Port>),
    Pid(Arc<Pid>),
    Tuple(Tuple),
    Map(Map),
    Nil,
    Cons(Arc<Cons>),
    Bitstring(Bitstring),
}
impl Term {
    pub const TRUE: Self = Self::Atom(Atom::TRUE);
    pub const FALSE: Self = Self::Atom(Atom::FALSE);
    pub const UNDEFINED: Self = Self::Atom(Atom::UNDEFINED);

    /// Creates an atom term from the given name
    pub fn atom(name: &str) -> Result<Self, AtomError> {
        Atom::try_from_str(name).map(Self::Atom)
    }

    /// Creates a binary term from the UTF-8 bytes of `s`
    pub fn binary(s: &str) -> Self {
        Self::Bitstring(Bitstring::from(s))
    }

    /// Returns the kind of this term, which determines its position in the term order
    pub fn kind(&self) -> Kind {
        match self {
            Self::Int(_) | Self::Float(_) => Kind::Number,
            Self::Atom(_) => Kind::Atom,
            Self::Reference(_) => Kind::Reference,
            Self::Function(_) | Self::Export(_) => Kind::Fun,
            Self::Port(_) => Kind::Port,
            Self::Pid(_) => Kind::Pid,
            Self::Tuple(_) => Kind::Tuple,
            Self::Map(_) => Kind::Map,
            Self::Nil => Kind::Nil,
            Self::Cons(_) => Kind::List,
            Self::Bitstring(_) => Kind::Bitstring,
        }
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    #[inline]
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(_))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns true if this term is `[]` or a cons cell, proper or not
    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Nil | Self::Cons(_))
    }

    /// Returns true if this term is `[]` or a proper list
    pub fn is_proper_list(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Cons(cons) => !cons.is_improper(),
            _ => false,
        }
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Bitstring(bits) if bits.is_binary())
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Atom(a) if a.is_boolean())
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Atom(a) => a.as_boolean(),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<Atom> {
        match self {
            Self::Atom(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&Int> {
        match self {
            Self::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&Float> {
        match self {
            Self::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Self::Tuple(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_bitstring(&self) -> Option<&Bitstring> {
        match self {
            Self::Bitstring(b) => Some(b),
            _ => None,
        }
    }

    /// Returns this term as a list, if it is `[]` or a cons cell
    pub fn as_list(&self) -> Option<List> {
        match self {
            Self::Nil => Some(List::Nil),
            Self::Cons(cons) => Some(List::Cons(cons.clone())),
            _ => None,
        }
    }
}

impl Default for Term {
    fn default() -> Self {
        Self::Nil
    }
}
impl From<Int> for Term {
    #[inline]
    fn from(i: Int) -> Self {
        Self::Int(i)
    }
}
impl From<i64> for Term {
    #[inline]
    fn from(i: i64) -> Self {
        Self::Int(Int::new(i))
    }
}
impl From<i32> for Term {
    #[inline]
    fn from(i: i32) -> Self {
        Self::Int(Int::new(i as i64))
    }
}
impl From<Float> for Term {
    #[inline]
    fn from(f: Float) -> Self {
        Self::Float(f)
    }
}
impl From<bool> for Term {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Atom(b.into())
    }
}
impl From<Atom> for Term {
    #[inline]
    fn from(a: Atom) -> Self {
        Self::Atom(a)
    }
}
impl From<Reference> for Term {
    fn from(r: Reference) -> Self {
        Self::Reference(Arc::new(r))
    }
}
impl From<Function> for Term {
    fn from(fun: Function) -> Self {
        Self::Function(Arc::new(fun))
    }
}
impl From<Export> for Term {
    fn from(export: Export) -> Self {
        Self::Export(Arc::new(export))
    }
}
impl From<Port> for Term {
    fn from(port: Port) -> Self {
        Self::Port(Arc::new(port))
    }
}
impl From<Pid> for Term {
    fn from(pid: Pid) -> Self {
        Self::Pid(Arc::new(pid))
    }
}
impl From<Tuple> for Term {
    #[inline]
    fn from(t: Tuple) -> Self {
        Self::Tuple(t)
    }
}
impl From<Map> for Term {
    #[inline]
    fn from(m: Map) -> Self {
        Self::Map(m)
    }
}
impl From<List> for Term {
    #[inline]
    fn from(list: List) -> Self {
        match list {
            List::Nil => Self::Nil,
            List::Cons(cons) => Self::Cons(cons),
        }
    }
}
impl From<Bitstring> for Term {
    #[inline]
    fn from(b: Bitstring) -> Self {
        Self::Bitstring(b)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(float) => write!(f, "{:?}", float),
            Self::Atom(a) => write!(f, "{:?}", a),
            Self::Reference(r) => write!(f, "{}", r),
            Self::Function(fun) => write!(f, "{}", fun),
            Self::Export(export) => write!(f, "{}", export),
            Self::Port(port) => write!(f, "{}", port),
            Self::Pid(pid) => write!(f, "{}", pid),
            Self::Tuple(t) => write!(f, "{:?}", t),
            Self::Map(m) => write!(f, "{:?}", m),
            Self::Nil => f.write_str("[]"),
            Self::Cons(cons) => fmt::Debug::fmt(&List::Cons(cons.clone()), f),
            Self::Bitstring(b) => write!(f, "{:?}", b),
        }
    }
}

/// Renders the term as an Erlang literal
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(float) => write!(f, "{}", float),
            Self::Atom(a) => write!(f, "{}", a),
            Self::Reference(r) => write!(f, "{}", r),
            Self::Function(fun) => write!(f, "{}", fun),
            Self::Export(export) => write!(f, "{}", export),
            Self::Port(port) => write!(f, "{}", port),
            Self::Pid(pid) => write!(f, "{}", pid),
            Self::Tuple(t) => write!(f, "{}", t),
            Self::Map(m) => write!(f, "{}", m),
            Self::Nil => f.write_str("[]"),
            Self::Cons(cons) => fmt::Display::fmt(&List::Cons(cons.clone()), f),
            Self::Bitstring(b) => write!(f, "{}", b),
        }
    }
}
