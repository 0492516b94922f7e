use core::fmt;

use crate::Atom;

/// A process identifier
///
/// Pids are ordered by node, then id, then serial, then creation.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid {
    node: Atom,
    id: u32,
    serial: u32,
    creation: u32,
}
impl Pid {
    pub fn new(node: Atom, id: u32, serial: u32, creation: u32) -> Self {
        Self {
            node,
            id,
            serial,
            creation,
        }
    }

    #[inline]
    pub fn node(&self) -> Atom {
        self.node
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn serial(&self) -> u32 {
        self.serial
    }

    #[inline]
    pub fn creation(&self) -> u32 {
        self.creation
    }
}
impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#Pid<{}.{}.{}.{}>",
            self.node.as_str(),
            self.id,
            self.serial,
            self.creation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare, Term};

    #[test]
    fn creation_breaks_ties() {
        let node = Atom::try_from_str("nonode@nohost").unwrap();
        let a = Term::from(Pid::new(node, 100, 5, 1));
        let b = Term::from(Pid::new(node, 100, 5, 0));
        assert_eq!(compare(&a, &b), 1);
        assert_eq!(compare(&b, &a), -1);

        let c = Term::from(Pid::new(node, 99, 6, 2));
        assert_eq!(compare(&c, &b), -1);
    }

    #[test]
    fn display() {
        let node = Atom::try_from_str("nonode@nohost").unwrap();
        assert_eq!(Pid::new(node, 80, 0, 0).to_string(), "#Pid<nonode@nohost.80.0.0>");
    }
}
