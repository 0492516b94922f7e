use crate::Term;

use super::{Cons, ImproperListError};

/// Iterates over the elements of a list
///
/// If the list is improper, the final item is an error holding the tail.
pub struct Iter<'a> {
    cell: Option<&'a Cons>,
    improper: Option<&'a Term>,
}
impl<'a> Iter<'a> {
    pub(super) fn new(cell: Option<&'a Cons>) -> Self {
        Self {
            cell,
            improper: None,
        }
    }
}
impl<'a> Iterator for Iter<'a> {
    type Item = Result<&'a Term, ImproperListError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(cell) = self.cell.take() {
            match cell.tail() {
                Term::Cons(next) => self.cell = Some(&**next),
                Term::Nil => (),
                tail => self.improper = Some(tail),
            }
            return Some(Ok(cell.head()));
        }
        self.improper
            .take()
            .map(|tail| Err(ImproperListError { tail: tail.clone() }))
    }
}
impl core::iter::FusedIterator for Iter<'_> {}

/// Iterates over the cells of a list, stopping at the first tail which is not a cell
///
/// Unlike [`Iter`], this never fails on improper lists.
pub struct Cells<'a> {
    cell: Option<&'a Cons>,
}
impl<'a> Cells<'a> {
    pub(super) fn new(cell: Option<&'a Cons>) -> Self {
        Self { cell }
    }
}
impl<'a> Iterator for Cells<'a> {
    type Item = &'a Cons;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cell.take()?;
        if let Term::Cons(next) = cell.tail() {
            self.cell = Some(&**next);
        }
        Some(cell)
    }
}
impl core::iter::FusedIterator for Cells<'_> {}
