//! A persistent vector, implemented as a 32-way trie over a dense index space.
//!
//! Leaves hold up to 32 elements, internal nodes hold up to 32 children, and every node
//! except those on the right-most path is full. The path to index `i` is given by the
//! 5-bit chunks of `i`, most significant first. Nodes are reference-counted and never
//! modified after construction, so "modifying" a trie copies only the nodes on the path
//! to the modified index.
use std::sync::Arc;

use log::trace;

pub const BRANCH_BITS: usize = 5;
pub const BRANCH_FACTOR: usize = 1 << BRANCH_BITS;
const MASK: usize = BRANCH_FACTOR - 1;

pub(crate) enum Node<T> {
    Leaf(Arc<Vec<T>>),
    Branch(Arc<Vec<Node<T>>>),
}
impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(items) => Self::Leaf(items.clone()),
            Self::Branch(children) => Self::Branch(children.clone()),
        }
    }
}
impl<T> Node<T> {
    fn empty() -> Self {
        Self::Leaf(Arc::new(Vec::new()))
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => Arc::ptr_eq(a, b),
            (Self::Branch(a), Self::Branch(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn children(&self) -> &[Node<T>] {
        match self {
            Self::Branch(children) => children.as_slice(),
            Self::Leaf(_) => &[],
        }
    }
}

pub struct Trie<T> {
    root: Node<T>,
    size: usize,
    /// The height of the root, leaves are at level 0
    levels: usize,
}
impl<T> Clone for Trie<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            levels: self.levels,
        }
    }
}
impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> Trie<T> {
    pub fn new() -> Self {
        Self {
            root: Node::empty(),
            size: 0,
            levels: 0,
        }
    }

    /// Builds a trie bottom-up from the given elements
    pub fn from_vec(items: Vec<T>) -> Self {
        let size = items.len();
        let mut nodes: Vec<Node<T>> = chunked(items)
            .into_iter()
            .map(|chunk| Node::Leaf(Arc::new(chunk)))
            .collect();
        let mut levels = 0;
        while nodes.len() > 1 {
            nodes = chunked(nodes)
                .into_iter()
                .map(|chunk| Node::Branch(Arc::new(chunk)))
                .collect();
            levels += 1;
        }
        let root = nodes.pop().unwrap_or_else(Node::empty);
        Self { root, size, levels }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    #[inline]
    fn shift(&self) -> usize {
        self.levels * BRANCH_BITS
    }

    /// The number of elements this trie can hold without growing another level
    #[inline]
    fn capacity(&self) -> usize {
        1 << (BRANCH_BITS * (self.levels + 1))
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Node<T> {
        &self.root
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.size == other.size
            && match (&self.root, &other.root) {
                (Node::Leaf(a), Node::Leaf(b)) => Arc::ptr_eq(a, b),
                (Node::Branch(a), Node::Branch(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.leaf_for(index)?.get(index & MASK)
    }

    /// Returns the leaf which holds `index`
    fn leaf_for(&self, index: usize) -> Option<&[T]> {
        if index >= self.size {
            return None;
        }
        let mut node = &self.root;
        let mut shift = self.shift();
        loop {
            match node {
                Node::Leaf(items) => return Some(items.as_slice()),
                Node::Branch(children) => {
                    node = children.get((index >> shift) & MASK)?;
                    shift -= BRANCH_BITS;
                }
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            trie: self,
            leaf: &[],
            front: 0,
            back: self.size,
        }
    }
}
impl<T: Clone> Trie<T> {
    /// Replaces the element at `index`, copying only the nodes on the path to it
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn update(&self, index: usize, value: T) -> Option<Self> {
        if index >= self.size {
            return None;
        }
        Some(Self {
            root: update_node(&self.root, self.shift(), index, value),
            size: self.size,
            levels: self.levels,
        })
    }

    /// Appends `value`, growing the trie by one level if it is at capacity
    pub fn push(&self, value: T) -> Self {
        if self.size % BRANCH_FACTOR == 0 {
            return self.push_leaf(vec![value]);
        }
        Self {
            root: push_node(&self.root, self.shift(), self.size, value),
            size: self.size + 1,
            levels: self.levels,
        }
    }

    /// Appends a new leaf of at most 32 elements to a trie whose last leaf is full
    fn push_leaf(&self, leaf: Vec<T>) -> Self {
        debug_assert_eq!(self.size % BRANCH_FACTOR, 0);
        debug_assert!(leaf.len() <= BRANCH_FACTOR);
        let len = leaf.len();
        if len == 0 {
            return self.clone();
        }
        if self.size == 0 {
            return Self {
                root: Node::Leaf(Arc::new(leaf)),
                size: len,
                levels: 0,
            };
        }

        let leaf = Node::Leaf(Arc::new(leaf));
        if self.size == self.capacity() {
            trace!(
                "growing trie of {} elements to {} levels",
                self.size,
                self.levels + 1
            );
            let root = vec![self.root.clone(), wrap(leaf, self.levels)];
            return Self {
                root: Node::Branch(Arc::new(root)),
                size: self.size + len,
                levels: self.levels + 1,
            };
        }

        let root = match &self.root {
            Node::Branch(children) => attach(children, self.shift(), self.size, leaf),
            // A single leaf is only below capacity while it has room, which was ruled out above
            Node::Leaf(_) => Node::Branch(Arc::new(vec![self.root.clone(), leaf])),
        };
        Self {
            root,
            size: self.size + len,
            levels: self.levels,
        }
    }

    /// Appends all of the given elements
    pub fn extend<I: IntoIterator<Item = T>>(&self, items: I) -> Self {
        let mut items = items.into_iter();
        let mut trie = self.clone();
        // Top up the last leaf first, after which whole leaves can be attached
        while trie.size % BRANCH_FACTOR != 0 {
            match items.next() {
                Some(item) => trie = trie.push(item),
                None => return trie,
            }
        }
        loop {
            let chunk: Vec<T> = items.by_ref().take(BRANCH_FACTOR).collect();
            if chunk.is_empty() {
                return trie;
            }
            trie = trie.push_leaf(chunk);
        }
    }

    /// Keeps the first `len` elements, sharing every untouched subtree
    pub fn truncate(&self, len: usize) -> Self {
        if len >= self.size {
            return self.clone();
        }
        if len == 0 {
            return Self::new();
        }

        let mut root = truncate_node(&self.root, self.shift(), len);
        let mut levels = self.levels;
        while levels > 0 {
            let child = match &root {
                Node::Branch(children) if children.len() == 1 => children[0].clone(),
                _ => break,
            };
            root = child;
            levels -= 1;
        }
        if levels != self.levels {
            trace!(
                "shrinking trie of {} elements to {} levels",
                len,
                levels
            );
        }
        Self {
            root,
            size: len,
            levels,
        }
    }

    /// Discards all elements from `from` onwards, then appends `items`
    pub fn replace_suffix<I: IntoIterator<Item = T>>(&self, from: usize, items: I) -> Self {
        self.truncate(from).extend(items)
    }

    /// Collects the elements in `[from, from + len)`, visiting only the subtrees in range
    pub fn slice(&self, from: usize, len: usize) -> Vec<T> {
        let to = from.saturating_add(len).min(self.size);
        let mut out = Vec::with_capacity(to.saturating_sub(from));
        if from < to {
            collect_range(&self.root, self.shift(), 0, from, to, &mut out);
        }
        out
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.slice(0, self.size)
    }
}

fn chunked<T>(items: Vec<T>) -> Vec<Vec<T>> {
    let mut chunks = Vec::with_capacity((items.len() + MASK) / BRANCH_FACTOR);
    let mut items = items.into_iter();
    loop {
        let chunk: Vec<T> = items.by_ref().take(BRANCH_FACTOR).collect();
        if chunk.is_empty() {
            return chunks;
        }
        chunks.push(chunk);
    }
}

/// Wraps `node` in `levels` single-child branches
fn wrap<T>(node: Node<T>, levels: usize) -> Node<T> {
    (0..levels).fold(node, |node, _| Node::Branch(Arc::new(vec![node])))
}

fn update_node<T: Clone>(node: &Node<T>, shift: usize, index: usize, value: T) -> Node<T> {
    match node {
        Node::Leaf(items) => {
            let mut items = Vec::clone(items);
            items[index & MASK] = value;
            Node::Leaf(Arc::new(items))
        }
        Node::Branch(children) => {
            let mut children = Vec::clone(children);
            let i = (index >> shift) & MASK;
            children[i] = update_node(&children[i], shift - BRANCH_BITS, index, value);
            Node::Branch(Arc::new(children))
        }
    }
}

/// Pushes `value` onto the partially filled leaf which holds `index`
fn push_node<T: Clone>(node: &Node<T>, shift: usize, index: usize, value: T) -> Node<T> {
    match node {
        Node::Leaf(items) => {
            let mut items = Vec::clone(items);
            items.push(value);
            Node::Leaf(Arc::new(items))
        }
        Node::Branch(children) => {
            let mut children = Vec::clone(children);
            let i = (index >> shift) & MASK;
            children[i] = push_node(&children[i], shift - BRANCH_BITS, index, value);
            Node::Branch(Arc::new(children))
        }
    }
}

/// Attaches `leaf` as the leaf starting at `index`, creating any missing branches
fn attach<T>(children: &[Node<T>], shift: usize, index: usize, leaf: Node<T>) -> Node<T> {
    let i = (index >> shift) & MASK;
    let mut children = children.to_vec();
    match children.get(i) {
        Some(Node::Branch(grandchildren)) => {
            let child = attach(grandchildren, shift - BRANCH_BITS, index, leaf);
            children[i] = child;
        }
        _ => children.push(wrap(leaf, shift / BRANCH_BITS - 1)),
    }
    Node::Branch(Arc::new(children))
}

/// Keeps the first `len` elements below `node`, where `len > 0`
fn truncate_node<T: Clone>(node: &Node<T>, shift: usize, len: usize) -> Node<T> {
    match node {
        Node::Leaf(items) if items.len() == len => node.clone(),
        Node::Leaf(items) => Node::Leaf(Arc::new(items[..len].to_vec())),
        Node::Branch(children) => {
            let child_capacity = 1 << shift;
            let last = (len - 1) / child_capacity;
            let remaining = len - last * child_capacity;
            let mut kept = children[..last].to_vec();
            kept.push(truncate_node(&children[last], shift - BRANCH_BITS, remaining));
            Node::Branch(Arc::new(kept))
        }
    }
}

fn collect_range<T: Clone>(
    node: &Node<T>,
    shift: usize,
    offset: usize,
    from: usize,
    to: usize,
    out: &mut Vec<T>,
) {
    match node {
        Node::Leaf(items) => {
            let start = from.saturating_sub(offset);
            let end = (to - offset).min(items.len());
            if start < end {
                out.extend_from_slice(&items[start..end]);
            }
        }
        Node::Branch(children) => {
            let child_capacity = 1 << shift;
            let first = from.saturating_sub(offset) / child_capacity;
            for (i, child) in children.iter().enumerate().skip(first) {
                let child_offset = offset + i * child_capacity;
                if child_offset >= to {
                    break;
                }
                collect_range(child, shift - BRANCH_BITS, child_offset, from, to, out);
            }
        }
    }
}

/// Iterates over the elements of a trie, descending the trie once per leaf
pub struct Iter<'a, T> {
    trie: &'a Trie<T>,
    leaf: &'a [T],
    front: usize,
    back: usize,
}
impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            trie: self.trie,
            leaf: self.leaf,
            front: self.front,
            back: self.back,
        }
    }
}
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let offset = self.front & MASK;
        if offset == 0 || self.leaf.is_empty() {
            self.leaf = self.trie.leaf_for(self.front)?;
        }
        self.front += 1;
        self.leaf.get(offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}
impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.trie.get(self.back)
    }
}
impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> core::iter::FusedIterator for Iter<'_, T> {}
