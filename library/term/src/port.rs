use core::fmt;

use crate::Atom;

/// A port identifier, ordered by node, then id, then creation
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port {
    node: Atom,
    id: u64,
    creation: u32,
}
impl Port {
    pub fn new(node: Atom, id: u64, creation: u32) -> Self {
        Self { node, id, creation }
    }

    #[inline]
    pub fn node(&self) -> Atom {
        self.node
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn creation(&self) -> u32 {
        self.creation
    }
}
impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#Port<{}.{}.{}>", self.node.as_str(), self.id, self.creation)
    }
}
