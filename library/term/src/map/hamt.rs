//! A persistent hash array mapped trie.
//!
//! Each level of the trie consumes 5 bits of a key's 64-bit hash. Bitmap nodes store
//! only their occupied slots, in fragment order, with a bitmap recording which of the
//! 32 possible slots are present. Keys whose hashes are identical in all 64 bits share
//! a collision node at the bottom of the trie.
use std::sync::Arc;

use log::debug;

pub const BITS_PER_LEVEL: u32 = 5;
const LEVEL_MASK: u64 = (1 << BITS_PER_LEVEL) - 1;
const HASH_BITS: u32 = u64::BITS;

/// Keys stored in a [`Hamt`] provide their own hashing and equality
pub trait HamtKey: Clone {
    fn key_hash(&self) -> u64;
    fn key_eq(&self, other: &Self) -> bool;
}

#[inline]
fn fragment(hash: u64, shift: u32) -> u32 {
    ((hash >> shift) & LEVEL_MASK) as u32
}

#[inline]
fn slot_index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

enum Node<K, V> {
    Bitmap { bitmap: u32, slots: Vec<Slot<K, V>> },
    Collision { hash: u64, entries: Vec<(K, V)> },
}

enum Slot<K, V> {
    Entry { hash: u64, key: K, value: V },
    Child(Arc<Node<K, V>>),
}
impl<K: Clone, V: Clone> Clone for Slot<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Entry { hash, key, value } => Self::Entry {
                hash: *hash,
                key: key.clone(),
                value: value.clone(),
            },
            Self::Child(child) => Self::Child(child.clone()),
        }
    }
}

/// The result of removing a key from a node
enum Removed<K, V> {
    NotFound,
    /// The node no longer has any entries
    Empty,
    /// The node has a single remaining entry, which can be inlined into the parent
    Single { hash: u64, key: K, value: V },
    Node(Node<K, V>),
}

impl<K: HamtKey, V: Clone> Node<K, V> {
    fn empty() -> Self {
        Self::Bitmap {
            bitmap: 0,
            slots: Vec::new(),
        }
    }

    fn get(&self, shift: u32, hash: u64, key: &K) -> Option<(&K, &V)> {
        let mut node = self;
        let mut shift = shift;
        loop {
            match node {
                Self::Bitmap { bitmap, slots } => {
                    let bit = 1u32 << fragment(hash, shift);
                    if bitmap & bit == 0 {
                        return None;
                    }
                    match &slots[slot_index(*bitmap, bit)] {
                        Slot::Entry {
                            hash: h,
                            key: k,
                            value,
                        } => {
                            return (*h == hash && k.key_eq(key)).then_some((k, value));
                        }
                        Slot::Child(child) => {
                            node = &**child;
                            shift += BITS_PER_LEVEL;
                        }
                    }
                }
                Self::Collision { hash: h, entries } => {
                    if *h != hash {
                        return None;
                    }
                    return entries
                        .iter()
                        .find(|(k, _)| k.key_eq(key))
                        .map(|(k, v)| (k, v));
                }
            }
        }
    }

    /// Returns the new node, and whether the number of entries grew
    fn insert(&self, shift: u32, hash: u64, key: K, value: V) -> (Self, bool) {
        match self {
            Self::Bitmap { bitmap, slots } => {
                let bit = 1u32 << fragment(hash, shift);
                let index = slot_index(*bitmap, bit);
                let mut slots = slots.clone();
                if bitmap & bit == 0 {
                    slots.insert(index, Slot::Entry { hash, key, value });
                    let node = Self::Bitmap {
                        bitmap: bitmap | bit,
                        slots,
                    };
                    return (node, true);
                }
                let added = match &slots[index] {
                    Slot::Entry {
                        hash: h,
                        key: k,
                        value: v,
                    } => {
                        if *h == hash && k.key_eq(&key) {
                            slots[index] = Slot::Entry { hash, key, value };
                            false
                        } else {
                            let child = merge(
                                shift + BITS_PER_LEVEL,
                                (*h, k.clone(), v.clone()),
                                (hash, key, value),
                            );
                            slots[index] = Slot::Child(Arc::new(child));
                            true
                        }
                    }
                    Slot::Child(child) => {
                        let (child, added) = child.insert(shift + BITS_PER_LEVEL, hash, key, value);
                        slots[index] = Slot::Child(Arc::new(child));
                        added
                    }
                };
                let node = Self::Bitmap {
                    bitmap: *bitmap,
                    slots,
                };
                (node, added)
            }
            Self::Collision { hash: h, entries } => {
                debug_assert_eq!(*h, hash);
                let mut entries = entries.clone();
                match entries.iter().position(|(k, _)| k.key_eq(&key)) {
                    Some(position) => {
                        entries[position] = (key, value);
                        (Self::Collision { hash: *h, entries }, false)
                    }
                    None => {
                        entries.push((key, value));
                        (Self::Collision { hash: *h, entries }, true)
                    }
                }
            }
        }
    }

    fn remove(&self, shift: u32, hash: u64, key: &K) -> Removed<K, V> {
        match self {
            Self::Bitmap { bitmap, slots } => {
                let bit = 1u32 << fragment(hash, shift);
                if bitmap & bit == 0 {
                    return Removed::NotFound;
                }
                let index = slot_index(*bitmap, bit);
                match &slots[index] {
                    Slot::Entry { hash: h, key: k, .. } => {
                        if *h != hash || !k.key_eq(key) {
                            return Removed::NotFound;
                        }
                        Self::without(*bitmap, slots, bit, index, shift)
                    }
                    Slot::Child(child) => match child.remove(shift + BITS_PER_LEVEL, hash, key) {
                        Removed::NotFound => Removed::NotFound,
                        Removed::Empty => Self::without(*bitmap, slots, bit, index, shift),
                        Removed::Single { hash, key, value } => {
                            if slots.len() == 1 && shift > 0 {
                                return Removed::Single { hash, key, value };
                            }
                            let mut slots = slots.clone();
                            slots[index] = Slot::Entry { hash, key, value };
                            Removed::Node(Self::Bitmap {
                                bitmap: *bitmap,
                                slots,
                            })
                        }
                        Removed::Node(node) => {
                            let mut slots = slots.clone();
                            slots[index] = Slot::Child(Arc::new(node));
                            Removed::Node(Self::Bitmap {
                                bitmap: *bitmap,
                                slots,
                            })
                        }
                    },
                }
            }
            Self::Collision { hash: h, entries } => {
                let position = match entries.iter().position(|(k, _)| k.key_eq(key)) {
                    Some(position) if *h == hash => position,
                    _ => return Removed::NotFound,
                };
                let mut entries = entries.clone();
                entries.remove(position);
                if entries.len() == 1 {
                    let (key, value) = entries.remove(0);
                    Removed::Single {
                        hash: *h,
                        key,
                        value,
                    }
                } else {
                    Removed::Node(Self::Collision { hash: *h, entries })
                }
            }
        }
    }

    /// Removes the slot at `index` from a bitmap node, collapsing the node if possible
    fn without(bitmap: u32, slots: &[Slot<K, V>], bit: u32, index: usize, shift: u32) -> Removed<K, V> {
        if slots.len() == 1 {
            return Removed::Empty;
        }
        if slots.len() == 2 && shift > 0 {
            if let Slot::Entry { hash, key, value } = &slots[1 - index] {
                return Removed::Single {
                    hash: *hash,
                    key: key.clone(),
                    value: value.clone(),
                };
            }
        }
        let mut slots = slots.to_vec();
        slots.remove(index);
        Removed::Node(Self::Bitmap {
            bitmap: bitmap & !bit,
            slots,
        })
    }
}

/// Builds the subtree holding two entries whose hashes agree on all bits below `shift`
fn merge<K, V>(shift: u32, a: (u64, K, V), b: (u64, K, V)) -> Node<K, V> {
    if shift >= HASH_BITS {
        debug!("creating collision node for hash {:#018x}", a.0);
        return Node::Collision {
            hash: a.0,
            entries: vec![(a.1, a.2), (b.1, b.2)],
        };
    }
    let fa = fragment(a.0, shift);
    let fb = fragment(b.0, shift);
    if fa == fb {
        let child = merge(shift + BITS_PER_LEVEL, a, b);
        return Node::Bitmap {
            bitmap: 1u32 << fa,
            slots: vec![Slot::Child(Arc::new(child))],
        };
    }
    let entry = |(hash, key, value): (u64, K, V)| Slot::Entry { hash, key, value };
    let slots = if fa < fb {
        vec![entry(a), entry(b)]
    } else {
        vec![entry(b), entry(a)]
    };
    Node::Bitmap {
        bitmap: (1u32 << fa) | (1u32 << fb),
        slots,
    }
}

/// A persistent map from `K` to `V`
pub struct Hamt<K, V> {
    root: Arc<Node<K, V>>,
    size: usize,
}
impl<K, V> Clone for Hamt<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
        }
    }
}
impl<K: HamtKey, V: Clone> Default for Hamt<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
impl<K, V> Hamt<K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Iterates over the entries in hash order
    pub fn iter(&self) -> Iter<'_, K, V> {
        let stack = match &*self.root {
            Node::Bitmap { slots, .. } => vec![slots.iter()],
            Node::Collision { .. } => vec![],
        };
        Iter {
            stack,
            collision: Default::default(),
            remaining: self.size,
        }
    }
}
impl<K: HamtKey, V: Clone> Hamt<K, V> {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::empty()),
            size: 0,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.root.get(0, key.key_hash(), key)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Returns a copy of this map with `key` set to `value`
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = key.key_hash();
        let (root, added) = self.root.insert(0, hash, key, value);
        Self {
            root: Arc::new(root),
            size: if added { self.size + 1 } else { self.size },
        }
    }

    /// Returns a copy of this map without `key`
    ///
    /// If the key is not present, the map is returned unchanged, sharing its root.
    pub fn remove(&self, key: &K) -> Self {
        match self.root.remove(0, key.key_hash(), key) {
            Removed::NotFound => self.clone(),
            Removed::Empty => Self::new(),
            Removed::Single { hash, key, value } => {
                let bit = 1u32 << fragment(hash, 0);
                let root = Node::Bitmap {
                    bitmap: bit,
                    slots: vec![Slot::Entry { hash, key, value }],
                };
                Self {
                    root: Arc::new(root),
                    size: self.size - 1,
                }
            }
            Removed::Node(root) => Self {
                root: Arc::new(root),
                size: self.size - 1,
            },
        }
    }
}
impl<K: HamtKey, V: Clone> FromIterator<(K, V)> for Hamt<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

pub struct Iter<'a, K, V> {
    stack: Vec<core::slice::Iter<'a, Slot<K, V>>>,
    collision: core::slice::Iter<'a, (K, V)>,
    remaining: usize,
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, value)) = self.collision.next() {
                self.remaining -= 1;
                return Some((key, value));
            }
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(Slot::Entry { key, value, .. }) => {
                    self.remaining -= 1;
                    return Some((key, value));
                }
                Some(Slot::Child(child)) => match &**child {
                    Node::Bitmap { slots, .. } => self.stack.push(slots.iter()),
                    Node::Collision { entries, .. } => self.collision = entries.iter(),
                },
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> core::iter::FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
impl<K, V> Hamt<K, V> {
    /// Follows `path`, a list of slot fragments, down both tries, and reports for each
    /// child of the node reached whether the two tries hold the very same child node
    pub(super) fn shared_children(&self, other: &Self, path: &[u32]) -> Vec<(u32, bool)> {
        fn child<K, V>(node: &Arc<Node<K, V>>, fragment: u32) -> Option<&Arc<Node<K, V>>> {
            match &**node {
                Node::Bitmap { bitmap, slots } => {
                    let bit = 1u32 << fragment;
                    if bitmap & bit == 0 {
                        return None;
                    }
                    match &slots[slot_index(*bitmap, bit)] {
                        Slot::Child(child) => Some(child),
                        Slot::Entry { .. } => None,
                    }
                }
                Node::Collision { .. } => None,
            }
        }

        let mut a = &self.root;
        let mut b = &other.root;
        for fragment in path {
            match (child(a, *fragment), child(b, *fragment)) {
                (Some(x), Some(y)) => {
                    a = x;
                    b = y;
                }
                _ => return vec![],
            }
        }
        (0..(1u32 << BITS_PER_LEVEL))
            .filter_map(|fragment| match (child(a, fragment), child(b, fragment)) {
                (Some(x), Some(y)) => Some((fragment, Arc::ptr_eq(x, y))),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A key with a controllable hash, to exercise collisions
    #[derive(Debug, Clone, PartialEq)]
    struct Key {
        id: u32,
        hash: u64,
    }
    impl HamtKey for Key {
        fn key_hash(&self) -> u64 {
            self.hash
        }
        fn key_eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    fn key(id: u32, hash: u64) -> Key {
        Key { id, hash }
    }

    #[test]
    fn insert_get_and_replace() {
        let map: Hamt<Key, u32> = (0..1000).map(|i| (key(i, i as u64 * 7919), i)).collect();
        assert_eq!(map.len(), 1000);
        for i in 0..1000 {
            assert_eq!(map.get(&key(i, i as u64 * 7919)), Some(&i));
        }
        assert_eq!(map.get(&key(1000, 1000 * 7919)), None);

        let replaced = map.insert(key(5, 5 * 7919), 50);
        assert_eq!(replaced.len(), 1000);
        assert_eq!(replaced.get(&key(5, 5 * 7919)), Some(&50));
        assert_eq!(map.get(&key(5, 5 * 7919)), Some(&5));
    }

    #[test]
    fn colliding_hashes() {
        let map = Hamt::new()
            .insert(key(1, 42), "a")
            .insert(key(2, 42), "b")
            .insert(key(3, 42), "c")
            .insert(key(4, 42 | 1 << 63), "d");
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(&key(2, 42)), Some(&"b"));
        assert_eq!(map.get(&key(4, 42 | 1 << 63)), Some(&"d"));
        assert_eq!(map.iter().count(), 4);

        let removed = map.remove(&key(2, 42)).remove(&key(1, 42));
        assert_eq!(removed.len(), 2);
        assert_eq!(removed.get(&key(3, 42)), Some(&"c"));
        assert_eq!(removed.get(&key(1, 42)), None);
    }

    #[test]
    fn remove_collapses_to_empty() {
        let keys: Vec<Key> = (0..100).map(|i| key(i, (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))).collect();
        let mut map: Hamt<Key, u32> = keys.iter().cloned().zip(0..).collect();
        for (i, k) in keys.iter().enumerate() {
            map = map.remove(k);
            assert_eq!(map.len(), 99 - i);
            assert_eq!(map.iter().count(), 99 - i);
            assert_eq!(map.get(k), None);
        }
        assert!(map.is_empty());
    }

    #[test]
    fn insert_copies_only_the_path_to_the_key() {
        // Hashes 0..2000 fill every root slot, and `i` and `i + 1024` share a child one level down
        let map: Hamt<Key, u32> = (0..2000).map(|i| (key(i, i as u64), i)).collect();
        let added = map.insert(key(5000, 7 | 3 << 5), 5000);
        assert_eq!(added.len(), 2001);
        assert_eq!(map.len(), 2000);
        assert_eq!(map.get(&key(5000, 7 | 3 << 5)), None);

        let root = map.shared_children(&added, &[]);
        assert_eq!(root.len(), 32);
        for (fragment, shared) in root {
            assert_eq!(shared, fragment != 7, "slot {}", fragment);
        }
        let below = map.shared_children(&added, &[7]);
        assert_eq!(below.len(), 31);
        for (fragment, shared) in below {
            assert_eq!(shared, fragment != 3, "slot 7/{}", fragment);
        }
    }

    #[test]
    fn remove_missing_shares_root() {
        let map = Hamt::new().insert(key(1, 1), 1);
        let same = map.remove(&key(2, 2));
        assert!(map.ptr_eq(&same));
    }
}
