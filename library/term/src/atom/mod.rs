mod table;

use self::table::AtomData;

use core::fmt::{self, Debug, Display, Write};
use core::hash::{Hash, Hasher};
use core::ptr;
use core::str;

use firefly_binary::helpers::write_escaped;
use thiserror::Error;

/// The maximum number of characters in an atom
pub const MAX_ATOM_CHARACTERS: usize = 255;

/// Produced by operations which create atoms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtomError {
    #[error("invalid atom, length is {0}, maximum length is {max}", max = MAX_ATOM_CHARACTERS)]
    InvalidLength(usize),
    #[error("tried to convert to an atom that doesn't exist")]
    NonExistent,
    #[error("invalid utf-8 bytes: {0}")]
    InvalidString(#[from] str::Utf8Error),
}

/// An atom is an interned string value with fast, constant-time equality comparison,
/// which only requires allocation once over the lifetime of the program.
///
/// Atoms whose names are not plain ASCII are flagged as UTF-8 atoms.
#[derive(Copy, Clone)]
pub struct Atom(&'static AtomData);
impl Atom {
    pub const TRUE: Atom = Self(&AtomData::TRUE);
    pub const FALSE: Atom = Self(&AtomData::FALSE);
    pub const NIL: Atom = Self(&AtomData::NIL);
    pub const UNDEFINED: Atom = Self(&AtomData::UNDEFINED);
    pub const EMPTY: Atom = Self(&AtomData::EMPTY);

    /// Creates a new atom from a slice of bytes interpreted as Latin-1.
    ///
    /// Returns `Err` if the atom name is invalid
    pub fn try_from_latin1_bytes(name: &[u8]) -> Result<Self, AtomError> {
        let name: String = name.iter().map(|b| *b as char).collect();
        Self::try_from_str(name)
    }

    /// Creates a new atom from a slice of UTF-8 bytes
    ///
    /// Returns `Err` if the bytes are not valid UTF-8 or the atom name is invalid
    pub fn try_from_utf8_bytes(name: &[u8]) -> Result<Self, AtomError> {
        Self::try_from_str(str::from_utf8(name)?)
    }

    /// Creates a new atom from a `str`.
    ///
    /// Returns `Err` if the atom name is invalid
    pub fn try_from_str<S: AsRef<str>>(s: S) -> Result<Self, AtomError> {
        let name = s.as_ref();
        Self::validate(name)?;
        Ok(Self(table::get_or_insert(name)))
    }

    /// Creates a new atom from a `str`, but only if the atom already exists
    ///
    /// Returns `Err` if the atom does not exist
    pub fn try_from_str_existing<S: AsRef<str>>(s: S) -> Result<Self, AtomError> {
        let name = s.as_ref();
        Self::validate(name)?;
        table::get_data(name)
            .map(Self)
            .ok_or(AtomError::NonExistent)
    }

    /// Returns `true` if this atom represents a boolean
    pub fn is_boolean(self) -> bool {
        self == Self::FALSE || self == Self::TRUE
    }

    /// Converts this atom to a boolean, if it is one
    pub fn as_boolean(self) -> Option<bool> {
        if self == Self::TRUE {
            Some(true)
        } else if self == Self::FALSE {
            Some(false)
        } else {
            None
        }
    }

    /// Gets the string value of this atom
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0.as_str()
    }

    /// Returns true if the name of this atom contains non-ASCII characters
    #[inline]
    pub fn is_utf8(&self) -> bool {
        self.0.is_utf8()
    }

    /// Returns the number of atoms interned so far
    pub fn table_size() -> usize {
        table::len()
    }

    /// Returns true if this atom requires quotes when printing as an Erlang term
    pub fn needs_quotes(&self) -> bool {
        let mut chars = self.as_str().chars();

        match chars.next() {
            Some(first_char) => {
                // Unquoted atoms start with a lowercase letter and continue with
                // letters, digits, `_` or `@`, Latin-1 letters included
                !is_lowercase(first_char)
                    || chars.any(|c| !is_name_char(c))
                    || is_reserved_word(self.as_str())
            }
            None => true,
        }
    }

    fn validate(name: &str) -> Result<(), AtomError> {
        let len = name.chars().count();
        if len > MAX_ATOM_CHARACTERS {
            return Err(AtomError::InvalidLength(len));
        }
        Ok(())
    }
}

fn is_lowercase(c: char) -> bool {
    c.is_ascii_lowercase() || (('ß'..='ÿ').contains(&c) && c != '÷')
}

fn is_uppercase(c: char) -> bool {
    c.is_ascii_uppercase() || (('À'..='Þ').contains(&c) && c != '×')
}

fn is_name_char(c: char) -> bool {
    is_lowercase(c) || is_uppercase(c) || c.is_ascii_digit() || c == '_' || c == '@'
}

fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "after"
            | "and"
            | "andalso"
            | "band"
            | "begin"
            | "bnot"
            | "bor"
            | "bsl"
            | "bsr"
            | "bxor"
            | "case"
            | "catch"
            | "cond"
            | "div"
            | "end"
            | "fun"
            | "if"
            | "let"
            | "maybe"
            | "not"
            | "of"
            | "or"
            | "orelse"
            | "receive"
            | "rem"
            | "try"
            | "when"
            | "xor"
    )
}

impl From<bool> for Atom {
    fn from(b: bool) -> Atom {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}
impl TryFrom<&str> for Atom {
    type Error = AtomError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_from_str(s)
    }
}
impl Eq for Atom {}
impl PartialEq for Atom {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // Names are unique in the table, but the constant singletons may live at a
        // different address than their table entries
        ptr::eq(self.0, other.0) || self.as_str() == other.as_str()
    }
}
impl PartialEq<str> for Atom {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}
impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Atom {
    /// Atoms are ordered by the bytes of their names
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        if self == other {
            return core::cmp::Ordering::Equal;
        }
        self.as_str().as_bytes().cmp(other.as_str().as_bytes())
    }
}
impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}
impl Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = self.as_str();
        if !name.is_empty() && !self.needs_quotes() {
            write!(f, ":{}", name)
        } else {
            write!(f, ":{:?}", name)
        }
    }
}
impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.needs_quotes() {
            f.write_char('\'')?;
            write_escaped(f, self.as_str(), '\'')?;
            f.write_char('\'')
        } else {
            f.write_str(self.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_interning() {
        let a = Atom::try_from_str("interning_test").unwrap();
        let b = Atom::try_from_str(String::from("interning_test")).unwrap();
        assert_eq!(a, b);
        assert!(ptr::eq(a.as_str().as_ptr(), b.as_str().as_ptr()));
        assert_eq!(
            Atom::try_from_str_existing("interning_test_missing"),
            Err(AtomError::NonExistent)
        );
    }

    #[test]
    fn atom_singletons() {
        assert_eq!(Atom::try_from_str("true").unwrap(), Atom::TRUE);
        assert_eq!(Atom::try_from_str("false").unwrap(), Atom::FALSE);
        assert_eq!(Atom::try_from_str("nil").unwrap(), Atom::NIL);
        assert_eq!(Atom::try_from_str("").unwrap(), Atom::EMPTY);
        assert_eq!(Atom::from(true), Atom::TRUE);
        assert_eq!(Atom::TRUE.as_boolean(), Some(true));
        assert_eq!(Atom::NIL.as_boolean(), None);
        assert!(Atom::FALSE.is_boolean());
    }

    #[test]
    fn atom_length_is_limited() {
        let name = "a".repeat(MAX_ATOM_CHARACTERS);
        assert!(Atom::try_from_str(&name).is_ok());
        let name = "a".repeat(MAX_ATOM_CHARACTERS + 1);
        assert_eq!(
            Atom::try_from_str(&name),
            Err(AtomError::InvalidLength(MAX_ATOM_CHARACTERS + 1))
        );
        // Characters, not bytes, are counted
        let name = "é".repeat(MAX_ATOM_CHARACTERS);
        assert!(Atom::try_from_str(&name).is_ok());
    }

    #[test]
    fn atom_encodings() {
        assert!(!Atom::try_from_str("plain").unwrap().is_utf8());
        assert!(Atom::try_from_str("ünïcode").unwrap().is_utf8());
        let latin1 = Atom::try_from_latin1_bytes(&[b'c', 0xE9]).unwrap();
        assert_eq!(latin1.as_str(), "cé");
        assert!(Atom::try_from_utf8_bytes(&[0xFF]).is_err());
    }

    #[test]
    fn atom_display() {
        let atom = |s: &str| Atom::try_from_str(s).unwrap();
        assert_eq!(atom("ok").to_string(), "ok");
        assert_eq!(atom("nonode@nohost").to_string(), "nonode@nohost");
        assert_eq!(atom("Ok").to_string(), "'Ok'");
        assert_eq!(atom("hello world").to_string(), "'hello world'");
        assert_eq!(atom("it's").to_string(), "'it\\'s'");
        assert_eq!(atom("receive").to_string(), "'receive'");
        assert_eq!(Atom::EMPTY.to_string(), "''");
    }

    #[test]
    fn latin1_letters_need_no_quotes() {
        let atom = |s: &str| Atom::try_from_str(s).unwrap();
        assert!(!atom("ßa").needs_quotes());
        assert!(!atom("öl").needs_quotes());
        assert!(!atom("ÿ").needs_quotes());
        assert!(!atom("aÀÞ_1@").needs_quotes());
        assert_eq!(atom("ça_va").to_string(), "ça_va");

        assert!(atom("÷").needs_quotes());
        assert!(atom("a×b").needs_quotes());
        assert!(atom("Ölkanne").needs_quotes());
        assert!(atom("ā").needs_quotes());
    }

    #[test]
    fn atom_debug() {
        let atom = |s: &str| Atom::try_from_str(s).unwrap();
        assert_eq!(format!("{:?}", atom("a")), ":a");
        assert_eq!(format!("{:?}", atom("hello world")), ":\"hello world\"");
        assert_eq!(format!("{:?}", Atom::EMPTY), ":\"\"");
    }

    #[test]
    fn atom_ordering_is_bytewise() {
        let atom = |s: &str| Atom::try_from_str(s).unwrap();
        assert!(atom("a") < atom("b"));
        assert!(atom("Z") < atom("a"));
        assert!(atom("ab") > atom("a"));
    }
}
