use core::cmp::Ordering;
use core::fmt;

use crate::cmp::cmp_seq;
use crate::{Atom, Pid, Term};

/// A reference to an exported function, i.e. `fun module:function/arity`
///
/// Exports are ordered by module, then function, then arity.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Export {
    module: Atom,
    function: Atom,
    arity: u8,
}
impl Export {
    pub fn new(module: Atom, function: Atom, arity: u8) -> Self {
        Self {
            module,
            function,
            arity,
        }
    }

    #[inline]
    pub fn module(&self) -> Atom {
        self.module
    }

    #[inline]
    pub fn function(&self) -> Atom {
        self.function
    }

    #[inline]
    pub fn arity(&self) -> u8 {
        self.arity
    }
}
impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "&{}.{}/{}", self.module, self.function, self.arity)
    }
}
impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fun {}:{}/{}", self.module, self.function, self.arity)
    }
}

/// A closure, identified by the module which defines it, its index and checksum within
/// that module, the process which created it and the values it captured.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Function {
    module: Atom,
    arity: u8,
    index: u32,
    uniq: [u8; 16],
    old_index: u32,
    old_uniq: u32,
    pid: Pid,
    free_vars: Vec<Term>,
}
impl Function {
    pub fn new(module: Atom, arity: u8, index: u32, uniq: [u8; 16], pid: Pid) -> Self {
        Self {
            module,
            arity,
            index,
            uniq,
            old_index: 0,
            old_uniq: 0,
            pid,
            free_vars: Vec::new(),
        }
    }

    /// Sets the index and checksum used by the older fun encoding
    pub fn with_old(mut self, old_index: u32, old_uniq: u32) -> Self {
        self.old_index = old_index;
        self.old_uniq = old_uniq;
        self
    }

    pub fn with_free_vars(mut self, free_vars: Vec<Term>) -> Self {
        self.free_vars = free_vars;
        self
    }

    #[inline]
    pub fn module(&self) -> Atom {
        self.module
    }

    #[inline]
    pub fn arity(&self) -> u8 {
        self.arity
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn uniq(&self) -> &[u8; 16] {
        &self.uniq
    }

    #[inline]
    pub fn old_index(&self) -> u32 {
        self.old_index
    }

    #[inline]
    pub fn old_uniq(&self) -> u32 {
        self.old_uniq
    }

    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    #[inline]
    pub fn free_vars(&self) -> &[Term] {
        self.free_vars.as_slice()
    }
}
impl PartialOrd for Function {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Function {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_with(other, false)
    }
}
impl Function {
    /// Orders closures, comparing free variables with `=:=` when `exact` is set
    pub(crate) fn cmp_with(&self, other: &Self, exact: bool) -> Ordering {
        (
            self.arity,
            &self.uniq,
            self.index,
            self.module,
            self.old_index,
            self.old_uniq,
            &self.pid,
        )
            .cmp(&(
                other.arity,
                &other.uniq,
                other.index,
                other.module,
                other.old_index,
                other.old_uniq,
                &other.pid,
            ))
            .then_with(|| cmp_seq(&self.free_vars, &other.free_vars, exact))
            .then_with(|| self.free_vars.len().cmp(&other.free_vars.len()))
    }
}
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("module", &self.module)
            .field("arity", &self.arity)
            .field("index", &self.index)
            .field("old_index", &self.old_index)
            .field("old_uniq", &self.old_uniq)
            .field("pid", &self.pid)
            .field("free_vars", &self.free_vars)
            .finish()
    }
}
impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#Fun<{}.{}.{}>", self.module, self.index, self.old_uniq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coerce, compare, compare_exact, ExactEq};

    fn atom(s: &str) -> Atom {
        Atom::try_from_str(s).unwrap()
    }

    fn closure(index: u32) -> Function {
        let pid = Pid::new(atom("nonode@nohost"), 1, 0, 0);
        Function::new(atom("lists"), 1, index, [0; 16], pid)
    }

    #[test]
    fn closures_sort_before_exports() {
        let fun = Term::from(closure(0));
        let export = Term::from(Export::new(atom("erlang"), atom("self"), 0));
        assert_eq!(compare(&fun, &export), -1);
        assert_eq!(compare(&export, &fun), 1);
    }

    #[test]
    fn exports_order_by_module_function_arity() {
        let a = Export::new(atom("a"), atom("z"), 9);
        let b = Export::new(atom("b"), atom("a"), 0);
        let c = Export::new(atom("b"), atom("a"), 1);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(c.to_string(), "fun b:a/1");
    }

    #[test]
    fn closures_order_by_arity_first() {
        let pid = Pid::new(atom("nonode@nohost"), 1, 0, 0);
        let unary = Function::new(atom("z"), 1, 99, [9; 16], pid.clone());
        let binary = Function::new(atom("a"), 2, 0, [0; 16], pid);
        assert!(unary < binary);

        let captured = closure(0).with_free_vars(vec![Term::from(1i64)]);
        assert!(closure(0) < captured);
        assert!(closure(0) < closure(1));
    }

    #[test]
    fn exact_equality_reaches_free_vars() {
        let int = Term::from(closure(0).with_free_vars(vec![Term::from(1i64)]));
        let float = Term::from(closure(0).with_free_vars(vec![coerce(1.0f64).unwrap()]));
        assert_eq!(int, float);
        assert_eq!(compare(&int, &float), 0);
        assert!(!int.exact_eq(&float));
        assert_eq!(compare_exact(&int, &float), -1);
        assert_eq!(compare_exact(&float, &int), 1);

        let longer = Term::from(
            closure(0).with_free_vars(vec![Term::from(1i64), Term::Nil]),
        );
        assert_eq!(compare_exact(&int, &longer), -1);
    }
}
