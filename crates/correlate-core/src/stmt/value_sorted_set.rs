use super::{Comparator, Value};

use std::hash::{Hash, Hasher};

/// A set whose elements are kept in comparator order.
///
/// Elements the comparator considers equal collapse into the first one
/// inserted.
#[derive(Debug, Clone, Default)]
pub struct ValueSortedSet {
    items: Vec<Value>,
    comparator: Comparator,
}

impl ValueSortedSet {
    pub fn new(comparator: Comparator) -> Self {
        Self {
            items: vec![],
            comparator,
        }
    }

    pub fn with_capacity(comparator: Comparator, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            comparator,
        }
    }

    /// Inserts a value at its sorted position, returning `false` if an equal
    /// element was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        match self
            .items
            .binary_search_by(|probe| self.comparator.compare(probe, &value))
        {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, value);
                true
            }
        }
    }

    pub fn remove(&mut self, value: &Value) -> bool {
        match self
            .items
            .binary_search_by(|probe| self.comparator.compare(probe, value))
        {
            Ok(pos) => {
                self.items.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl PartialEq for ValueSortedSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ValueSortedSet {}

impl Hash for ValueSortedSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl IntoIterator for ValueSortedSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
