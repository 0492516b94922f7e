mod hamt;

pub use self::hamt::{Iter, BITS_PER_LEVEL};

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;
use thiserror::Error;

use self::hamt::{Hamt, HamtKey};

use crate::{ExactEq, IntoTerm, List, Term, TermError, Tuple};

/// Produced by map operations which require a key to be present, or by malformed input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("key not found: {0}")]
    KeyNotFound(String),
    #[error("expected an even number of keys and values, got {0} elements")]
    OddLength(usize),
}

/// Generates values for keys which are not present in a map
pub type DefaultFn = Arc<dyn Fn(&Term) -> Term + Send + Sync>;

impl HamtKey for Term {
    fn key_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self.exact_eq(other)
    }
}

/// An immutable map from terms to terms
///
/// Keys are unique under exact equality, so `1` and `1.0` are distinct keys. A map may
/// carry a default generator which `get` consults for missing keys; the generator takes
/// no part in equality, ordering or hashing.
#[derive(Clone, Default)]
pub struct Map {
    entries: Hamt<Term, Term>,
    default: Option<DefaultFn>,
}
impl Map {
    /// The empty map, `#{}`
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map from key/value pairs; later pairs replace earlier ones with equal keys
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, TermError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoTerm,
        V: IntoTerm,
    {
        let mut entries = Hamt::new();
        for (key, value) in pairs {
            entries = entries.insert(key.into_term()?, value.into_term()?);
        }
        Ok(Self {
            entries,
            default: None,
        })
    }

    /// Creates a map from a flat sequence of alternating keys and values
    pub fn from_flat<I, T>(elements: I) -> Result<Self, TermError>
    where
        I: IntoIterator<Item = T>,
        T: IntoTerm,
    {
        let elements = elements
            .into_iter()
            .map(IntoTerm::into_term)
            .collect::<Result<Vec<_>, _>>()?;
        if elements.len() % 2 != 0 {
            return Err(MapError::OddLength(elements.len()).into());
        }
        let mut elements = elements.into_iter();
        let mut pairs = Vec::with_capacity(elements.len() / 2);
        while let (Some(key), Some(value)) = (elements.next(), elements.next()) {
            pairs.push((key, value));
        }
        Ok(Self::from_terms(pairs))
    }

    /// Creates a map from pairs of terms
    pub fn from_terms(pairs: Vec<(Term, Term)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
            default: None,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if both maps share the same underlying trie
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.entries.ptr_eq(&other.entries)
    }

    /// Returns a copy of this map which generates values for missing keys with `fun`
    pub fn with_default<F>(&self, fun: F) -> Self
    where
        F: Fn(&Term) -> Term + Send + Sync + 'static,
    {
        Self {
            entries: self.entries.clone(),
            default: Some(Arc::new(fun)),
        }
    }

    /// Returns the generated default value for `key`, if this map has a generator
    pub fn default_for(&self, key: &Term) -> Option<Term> {
        self.default.as_ref().map(|fun| fun(key))
    }

    /// Returns the value for `key`, falling back to the default generator
    pub fn get(&self, key: &Term) -> Option<Term> {
        match self.entries.get(key) {
            Some(value) => Some(value.clone()),
            None => self.default_for(key),
        }
    }

    /// Returns the stored value for `key`, ignoring the default generator
    #[inline]
    pub fn lookup(&self, key: &Term) -> Option<&Term> {
        self.entries.get(key)
    }

    /// Returns the stored key and value equal to `key`
    #[inline]
    pub fn get_entry(&self, key: &Term) -> Option<(&Term, &Term)> {
        self.entries.get_key_value(key)
    }

    /// Like `lookup`, but a missing key is an error
    pub fn fetch(&self, key: &Term) -> Result<&Term, MapError> {
        self.lookup(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))
    }

    /// Returns the stored value for `key`, or `default`
    pub fn fetch_or(&self, key: &Term, default: Term) -> Term {
        self.lookup(key).cloned().unwrap_or(default)
    }

    /// Returns the stored value for `key`, or the result of calling `fallback` with the key
    pub fn fetch_with<F>(&self, key: &Term, fallback: F) -> Term
    where
        F: FnOnce(&Term) -> Term,
    {
        match self.lookup(key) {
            Some(value) => value.clone(),
            None => fallback(key),
        }
    }

    #[inline]
    pub fn contains_key(&self, key: &Term) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns a copy of this map with `key` associated to `value`
    pub fn put(&self, key: Term, value: Term) -> Self {
        Self {
            entries: self.entries.insert(key, value),
            default: self.default.clone(),
        }
    }

    /// Returns a copy of this map without `key`
    pub fn delete(&self, key: &Term) -> Self {
        Self {
            entries: self.entries.remove(key),
            default: self.default.clone(),
        }
    }

    /// Returns a map with the entries of both maps, preferring those of `other`
    pub fn merge(&self, other: &Self) -> Self {
        let (base, overrides, prefer_base) = if self.len() >= other.len() {
            (self, other, false)
        } else {
            (other, self, true)
        };
        let entries = overrides.iter().fold(base.entries.clone(), |entries, (k, v)| {
            if prefer_base && entries.contains_key(k) {
                entries
            } else {
                entries.insert(k.clone(), v.clone())
            }
        });
        Self {
            entries,
            default: self.default.clone(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Term> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Term> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Iterates over the entries in an order determined by key hashes
    #[inline]
    pub fn iter(&self) -> Iter<'_, Term, Term> {
        self.entries.iter()
    }

    /// Returns the entries ordered by key, using exact term order
    pub fn sorted_pairs(&self) -> Vec<(&Term, &Term)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by(|(a, _), (b, _)| crate::cmp::cmp(a, b, true));
        pairs
    }

    /// Returns a copy of this map with each value replaced by `fun(key, value)`
    pub fn map_values<F>(&self, mut fun: F) -> Self
    where
        F: FnMut(&Term, &Term) -> Term,
    {
        Self {
            entries: self
                .iter()
                .map(|(k, v)| (k.clone(), fun(k, v)))
                .collect(),
            default: self.default.clone(),
        }
    }

    /// Returns a copy of this map with only the entries for which `predicate` holds
    pub fn select<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Term, &Term) -> bool,
    {
        let entries = self.iter().fold(self.entries.clone(), |entries, (k, v)| {
            if predicate(k, v) {
                entries
            } else {
                entries.remove(k)
            }
        });
        Self {
            entries,
            default: self.default.clone(),
        }
    }

    /// Returns a list of `{Key, Value}` tuples, ordered by key as `maps:to_list/1` does
    pub fn to_list(&self) -> List {
        List::from_vec(
            self.sorted_pairs()
                .into_iter()
                .map(|(k, v)| Term::Tuple(Tuple::from_vec(vec![k.clone(), v.clone()])))
                .collect(),
        )
    }
}
impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Term, &'a Term);
    type IntoIter = Iter<'a, Term, Term>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
impl FromIterator<(Term, Term)> for Map {
    fn from_iter<I: IntoIterator<Item = (Term, Term)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            default: None,
        }
    }
}
impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("#{")?;
        for (i, (k, v)) in self.sorted_pairs().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?} => {:?}", k, v)?;
        }
        f.write_str("}")
    }
}
impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("#{")?;
        for (i, (k, v)) in self.sorted_pairs().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{} => {}", k, v)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Float;
    use pretty_assertions::assert_eq;

    fn atom(name: &str) -> Term {
        Term::atom(name).unwrap()
    }

    #[test]
    fn put_shares_every_untouched_subtree() {
        let map = Map::from_pairs((0..2000).map(|i| (i, i))).unwrap();
        let updated = map.put(Term::from(5000), atom("new"));
        assert_eq!(updated.size(), 2001);
        assert_eq!(map.size(), 2000);
        assert_eq!(map.get(&Term::from(5000)), None);

        // Only the root slot on the new key's path is copied
        let root = map.entries.shared_children(&updated.entries, &[]);
        assert!(root.len() > 16);
        let copied = root.iter().filter(|(_, shared)| !shared).collect::<Vec<_>>();
        assert_eq!(copied.len(), 1);
        let fragment = (Term::from(5000).key_hash() & 31) as u32;
        assert_eq!(copied[0].0, fragment);

        let replaced = map.put(Term::from(10), atom("ten"));
        let root = map.entries.shared_children(&replaced.entries, &[]);
        assert_eq!(root.iter().filter(|(_, shared)| !shared).count(), 1);
        assert_eq!(map.get(&Term::from(10)), Some(Term::from(10)));
    }

    #[test]
    fn flat_construction() {
        let map = Map::from_flat(vec![
            atom("a"),
            Term::from(1),
            Term::binary("one"),
            Term::Float(Float::new(1.0).unwrap()),
        ])
        .unwrap();
        assert_eq!(map.size(), 2);
        assert_eq!(map.get(&atom("a")), Some(Term::from(1)));
        assert_eq!(map.get(&Term::binary("one")), Some(Term::Float(Float::new(1.0).unwrap())));

        let odd = Map::from_flat(vec![atom("a")]);
        assert_eq!(odd.unwrap_err(), TermError::Map(MapError::OddLength(1)));
    }

    #[test]
    fn keys_are_exact() {
        let map = Map::new()
            .put(Term::from(1), atom("int"))
            .put(Term::Float(Float::new(1.0).unwrap()), atom("float"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup(&Term::from(1)), Some(&atom("int")));
    }

    #[test]
    fn fetch_variants() {
        let map = Map::from_terms(vec![(atom("a"), Term::from(1))]);
        assert_eq!(map.fetch(&atom("a")), Ok(&Term::from(1)));
        assert_eq!(
            map.fetch(&atom("b")),
            Err(MapError::KeyNotFound("b".to_string()))
        );
        assert_eq!(map.fetch_or(&atom("b"), Term::Nil), Term::Nil);
        assert_eq!(map.fetch_with(&atom("b"), |k| k.clone()), atom("b"));
        assert_eq!(map.get(&atom("b")), None);
    }

    #[test]
    fn default_generator() {
        let map = Map::from_terms(vec![(atom("a"), Term::from(1))]);
        let defaulted = map.with_default(|_| Term::from(0));
        assert_eq!(defaulted.get(&atom("missing")), Some(Term::from(0)));
        assert_eq!(defaulted.get(&atom("a")), Some(Term::from(1)));
        assert_eq!(defaulted.default_for(&atom("a")), Some(Term::from(0)));
        assert!(defaulted.fetch(&atom("missing")).is_err());
        assert_eq!(defaulted.put(atom("b"), Term::Nil).get(&atom("c")), Some(Term::from(0)));
        assert_eq!(defaulted, map);
    }

    #[test]
    fn put_delete_merge() {
        let a = Map::from_terms(vec![(atom("a"), Term::from(1)), (atom("b"), Term::from(2))]);
        let b = Map::from_terms(vec![(atom("b"), Term::from(3)), (atom("c"), Term::from(4))]);
        let merged = a.merge(&b);
        assert_eq!(
            merged,
            Map::from_terms(vec![
                (atom("a"), Term::from(1)),
                (atom("b"), Term::from(3)),
                (atom("c"), Term::from(4)),
            ])
        );
        let merged = b.merge(&a.put(atom("d"), Term::Nil));
        assert_eq!(merged.lookup(&atom("b")), Some(&Term::from(2)));
        assert_eq!(merged.len(), 4);

        let deleted = a.delete(&atom("a"));
        assert_eq!(deleted.len(), 1);
        assert!(!deleted.contains_key(&atom("a")));
        assert!(a.contains_key(&atom("a")));
        assert!(a.delete(&atom("z")).ptr_eq(&a));
    }

    #[test]
    fn transformations() {
        let map: Map = (0..10i64).map(|i| (Term::from(i), Term::from(i * i))).collect();
        let evens = map.select(|k, _| matches!(k, Term::Int(i) if i.to_usize().map_or(false, |i| i % 2 == 0)));
        assert_eq!(evens.len(), 5);
        let keys = map.map_values(|k, _| k.clone());
        assert!(keys.iter().all(|(k, v)| k == v));
        assert_eq!(map.keys().count(), 10);
        assert_eq!(
            map.sorted_pairs().first().map(|(k, v)| ((*k).clone(), (*v).clone())),
            Some((Term::from(0), Term::from(0)))
        );
    }

    #[test]
    fn rendering() {
        let map = Map::from_terms(vec![(atom("b"), Term::from(2)), (atom("a"), Term::binary("x"))]);
        assert_eq!(map.to_string(), r#"#{a => <<"x">>,b => 2}"#);
        assert_eq!(format!("{:?}", map), r#"#{:a => "x", :b => 2}"#);
        assert_eq!(map.to_list().to_string(), r#"[{a,<<"x">>},{b,2}]"#);
        assert_eq!(Map::new().to_string(), "#{}");
    }
}
