use super::Value;

use indexmap::IndexSet;
use std::hash::{Hash, Hasher};

/// An insertion-ordered set of distinct values.
///
/// Iteration yields elements in the order they were first inserted, which
/// also satisfies ordered-set semantics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValueSet {
    items: IndexSet<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: IndexSet::with_capacity(capacity),
        }
    }

    /// Inserts a value, returning `false` if an equal value was present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.items.insert(value)
    }

    pub fn remove(&mut self, value: &Value) -> bool {
        self.items.shift_remove(value)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
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
}

// Equality ignores order, so only the length participates in the hash.
impl Hash for ValueSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.len().hash(state);
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = indexmap::set::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
