use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use smallvec::SmallVec;
use thiserror::Error;

use crate::Atom;

/// The maximum number of 32-bit words in a reference id
pub const MAX_REFERENCE_IDS: usize = 5;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("a reference requires at least one id")]
    NoIds,
    #[error("a reference has at most {max} ids, got {0}", max = MAX_REFERENCE_IDS)]
    TooManyIds(usize),
}

/// The encoding generation a reference originates from
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReferenceFormat {
    /// A single id word
    Legacy,
    /// Multiple id words with a small creation
    New,
    /// Multiple id words with a 32-bit creation
    Newer,
}

/// A unique reference, ordered by node, then ids, then creation
///
/// The format a reference was created with is not part of its identity.
#[derive(Clone)]
pub struct Reference {
    node: Atom,
    ids: SmallVec<[u32; MAX_REFERENCE_IDS]>,
    creation: u32,
    format: ReferenceFormat,
}
impl Reference {
    /// Creates a legacy reference with a single id
    pub fn new(node: Atom, creation: u32, id: u32) -> Self {
        Self {
            node,
            ids: SmallVec::from_slice(&[id]),
            creation,
            format: ReferenceFormat::Legacy,
        }
    }

    /// Creates a reference from one to five id words
    pub fn new_ids(node: Atom, creation: u32, ids: &[u32]) -> Result<Self, ReferenceError> {
        match ids.len() {
            0 => return Err(ReferenceError::NoIds),
            n if n > MAX_REFERENCE_IDS => return Err(ReferenceError::TooManyIds(n)),
            _ => (),
        }
        // Only the newer encoding has room for a creation wider than two bits
        let format = if creation > 3 {
            ReferenceFormat::Newer
        } else {
            ReferenceFormat::New
        };
        Ok(Self {
            node,
            ids: SmallVec::from_slice(ids),
            creation,
            format,
        })
    }

    #[inline]
    pub fn node(&self) -> Atom {
        self.node
    }

    #[inline]
    pub fn ids(&self) -> &[u32] {
        self.ids.as_slice()
    }

    #[inline]
    pub fn creation(&self) -> u32 {
        self.creation
    }

    #[inline]
    pub fn format(&self) -> ReferenceFormat {
        self.format
    }
}
impl Reference {
    #[inline]
    fn identity(&self) -> (Atom, &[u32], u32) {
        (self.node, self.ids.as_slice(), self.creation)
    }
}
impl Eq for Reference {}
impl PartialEq for Reference {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}
impl Ord for Reference {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}
impl PartialOrd for Reference {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state)
    }
}
impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#Ref<{}.{}", self.node.as_str(), self.creation)?;
        for id in self.ids.iter() {
            write!(f, ".{}", id)?;
        }
        f.write_str(">")
    }
}
