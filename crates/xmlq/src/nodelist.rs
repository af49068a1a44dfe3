use crate::error::{Error, Result};
use crate::model::XmlNode;

/// Smallest capacity allocated once a list holds anything.
const MIN_CAPACITY: usize = 8;

/// An ordered, index-addressable sequence of node handles.
///
/// Duplicates are permitted and order is always preserved; the query
/// operations rely on both. The list borrows its nodes — dropping a list
/// never touches the underlying tree.
///
/// Growth is geometric (capacity at least doubles, starting at
/// [`MIN_CAPACITY`]) so appending stays amortized O(1). `clear` keeps the
/// allocation for reuse within an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeList<N> {
    items: Vec<N>,
}

impl<N> Default for NodeList<N> {
    fn default() -> Self {
        NodeList { items: Vec::new() }
    }
}

impl<N: XmlNode> NodeList<N> {
    pub fn new() -> Self {
        NodeList { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NodeList {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Ensure room for `additional` more nodes, at least doubling the
    /// current capacity when growth is needed.
    fn grow_for(&mut self, additional: usize) {
        let required = self.items.len() + additional;
        if required <= self.items.capacity() {
            return;
        }
        let mut target = self.items.capacity().max(MIN_CAPACITY);
        while target < required {
            target *= 2;
        }
        self.items.reserve_exact(target - self.items.len());
    }

    pub fn push(&mut self, node: N) {
        self.grow_for(1);
        self.items.push(node);
    }

    /// Insert `node` before position `at`; `at == len` appends.
    pub fn insert(&mut self, node: N, at: usize) -> Result<()> {
        if at > self.items.len() {
            return Err(Error::IndexOutOfBounds {
                index: at,
                len: self.items.len(),
            });
        }
        self.grow_for(1);
        self.items.insert(at, node);
        Ok(())
    }

    /// Remove `count` nodes starting at `from`.
    pub fn remove(&mut self, from: usize, count: usize) -> Result<()> {
        let end = from + count;
        if from >= self.items.len() || end > self.items.len() {
            return Err(Error::IndexOutOfBounds {
                index: end,
                len: self.items.len(),
            });
        }
        self.items.drain(from..end);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&N> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&N> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&N> {
        self.items.last()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.items.contains(node)
    }

    /// Drop all nodes but keep the storage.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace this list's contents with a copy of `other`'s, growing
    /// first if needed.
    pub fn assign(&mut self, other: &NodeList<N>) {
        self.items.clear();
        if other.len() > self.items.capacity() {
            self.grow_for(other.len());
        }
        self.items.extend(other.items.iter().cloned());
    }

    pub fn append(&mut self, other: &mut NodeList<N>) {
        self.grow_for(other.len());
        self.items.append(&mut other.items);
    }

    pub fn iter(&self) -> core::slice::Iter<'_, N> {
        self.items.iter()
    }
}

impl<N: XmlNode> From<Vec<N>> for NodeList<N> {
    fn from(items: Vec<N>) -> Self {
        NodeList { items }
    }
}

impl<'a, N: XmlNode> IntoIterator for &'a NodeList<N> {
    type Item = &'a N;
    type IntoIter = core::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<N: XmlNode> IntoIterator for NodeList<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
