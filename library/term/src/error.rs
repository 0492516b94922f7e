use firefly_binary::BitstringError;
use firefly_number::{FloatError, ParseFloatError};
use thiserror::Error;

use crate::{AtomError, ImproperListError, IndexError, MapError, ReferenceError};

/// The umbrella error type for term construction and term operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TermError {
    #[error(transparent)]
    Float(#[from] FloatError),
    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),
    #[error(transparent)]
    Bitstring(#[from] BitstringError),
    #[error(transparent)]
    Atom(#[from] AtomError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    ImproperList(#[from] ImproperListError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    /// Only lists can terminate a list built from zero elements
    #[error("expected a list tail, got {0}")]
    NotAList(String),
    /// The value has no defined mapping onto a term
    #[error("values of type {0} have no term representation")]
    Unrecognized(&'static str),
}
