use std::sync::Arc;

use crate::{Term, TermError};

use super::{Cons, List};

/// Accumulates the elements of a list front-to-back, then links the cells in one pass.
///
/// No cell is allocated until the list is built, so a partially built list is never
/// observable.
#[derive(Default)]
pub struct ListBuilder {
    elements: Vec<Term>,
}
impl ListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, element: Term) {
        self.elements.push(element);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Builds a proper list of the accumulated elements
    pub fn finish(self) -> List {
        match link(self.elements, Term::Nil) {
            Term::Cons(cons) => List::Cons(cons),
            _ => List::Nil,
        }
    }

    /// Builds a list of the accumulated elements terminated by `tail`
    ///
    /// If `tail` is not a list, the result is improper. With no accumulated elements the
    /// result is `tail` itself, which must then be a list.
    pub fn finish_with_tail(self, tail: Term) -> Result<List, TermError> {
        match link(self.elements, tail) {
            Term::Nil => Ok(List::Nil),
            Term::Cons(cons) => Ok(List::Cons(cons)),
            other => Err(TermError::NotAList(other.to_string())),
        }
    }
}
impl Extend<Term> for ListBuilder {
    fn extend<I: IntoIterator<Item = Term>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

fn link(elements: Vec<Term>, tail: Term) -> Term {
    elements
        .into_iter()
        .rev()
        .fold(tail, |tail, head| Term::Cons(Arc::new(Cons::new(head, tail))))
}
