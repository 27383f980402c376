use super::{
    accumulator::Copier,
    promise::{Promise, PromiseId},
};
use crate::{Error, Result};
use correlate_core::stmt::{Value, ValueRecord};

use indexmap::{IndexMap, IndexSet};

/// How rows are partitioned before batching.
///
/// The outer level of a [`Grouping`] gets one query per batch; the inner
/// level holds the keys that are batched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    /// No parent context: one implicit group, correlation values batched
    Flat,

    /// Parent → correlation value; correlation values batched per parent
    ByParent,

    /// Correlation value → parent; parent ids batched per correlation value
    ByCorrelation,
}

impl Orientation {
    pub(crate) fn batches_correlation_values(self) -> bool {
        !matches!(self, Orientation::ByCorrelation)
    }
}

/// Distinct key counts used to choose an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupingPlan {
    pub(crate) parents: usize,
    pub(crate) correlations: usize,
}

impl GroupingPlan {
    /// Picks the grouping with fewer outer groups. A tie groups by parent and
    /// batches correlation values.
    pub(crate) fn choose(&self) -> Orientation {
        if self.parents <= self.correlations {
            Orientation::ByParent
        } else {
            Orientation::ByCorrelation
        }
    }
}

/// Partitions rows by correlation key and, when a parent context is used,
/// by the parent id.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TupleGrouper {
    key_slot: usize,
    parent_slot: Option<usize>,
}

/// Promises created for one resolution call.
#[derive(Debug)]
pub(crate) struct Grouping {
    pub(crate) groups: IndexMap<Value, Group>,
    pub(crate) promises: Vec<Promise>,

    /// Rows with a null key, left for the default filler
    pub(crate) skipped: Vec<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct Group {
    pub(crate) promises: IndexMap<Value, PromiseId>,
}

impl TupleGrouper {
    pub(crate) fn new(key_slot: usize, parent_slot: Option<usize>) -> Self {
        Self {
            key_slot,
            parent_slot,
        }
    }

    /// Fails when the parent id slot lies outside a row.
    pub(crate) fn check_bounds(&self, path: &str, rows: &[ValueRecord]) -> Result<()> {
        let Some(slot) = self.parent_slot else {
            return Ok(());
        };

        match rows.iter().find(|row| row.len() <= slot) {
            Some(row) => Err(Error::invalid_configuration(format!(
                "parent id slot {slot} of '{path}' is out of bounds for a row of {} fields",
                row.len()
            ))),
            None => Ok(()),
        }
    }

    pub(crate) fn plan(&self, rows: &[ValueRecord]) -> GroupingPlan {
        let mut parents = IndexSet::new();
        let mut correlations = IndexSet::new();

        for row in rows {
            if let Some((parent, key)) = self.keys(row) {
                parents.insert(parent);
                correlations.insert(key);
            }
        }

        GroupingPlan {
            parents: parents.len(),
            correlations: correlations.len(),
        }
    }

    /// Orientation for batching `rows`: flat without a parent context,
    /// otherwise the planned choice.
    pub(crate) fn orientation(&self, rows: &[ValueRecord]) -> Orientation {
        if self.parent_slot.is_none() {
            Orientation::Flat
        } else {
            self.plan(rows).choose()
        }
    }

    /// Attaches every groupable row to the promise of its key. `copier`
    /// fans a value out should a row join an already resolved promise.
    pub(crate) fn group(
        &self,
        rows: &mut [ValueRecord],
        orientation: Orientation,
        copier: Copier,
    ) -> Grouping {
        let mut grouping = Grouping {
            groups: IndexMap::new(),
            promises: vec![],
            skipped: vec![],
        };

        for index in 0..rows.len() {
            let Some((parent, key)) = self.keys(&rows[index]) else {
                grouping.skipped.push(index);
                continue;
            };

            let (outer, inner) = match orientation {
                Orientation::Flat => (Value::Null, key),
                Orientation::ByParent => (parent, key),
                Orientation::ByCorrelation => (key, parent),
            };

            let group = grouping.groups.entry(outer).or_default();

            match group.promises.get(&inner) {
                Some(id) => {
                    grouping.promises[id.0].add(index, rows, self.key_slot, copier);
                }
                None => {
                    let id = PromiseId(grouping.promises.len());
                    grouping.promises.push(Promise::new(inner.clone(), index));
                    group.promises.insert(inner, id);
                }
            }
        }

        grouping
    }

    /// Returns `(parent, key)` for a groupable row, `None` for a row with a
    /// null key or a null parent id. Keys are normalized so references match
    /// the raw ids a query returns.
    fn keys(&self, row: &ValueRecord) -> Option<(Value, Value)> {
        let key = row[self.key_slot].key();
        if key.is_null() {
            return None;
        }

        let parent = match self.parent_slot {
            Some(slot) => {
                let parent = row[slot].key();
                if parent.is_null() {
                    return None;
                }
                parent.clone()
            }
            None => Value::Null,
        };

        Some((parent, key.clone()))
    }
}

#[cfg(test)]
impl Grouping {
    /// Looks up the promise of `inner` in the group of `outer`.
    pub(crate) fn lookup(&self, outer: &Value, inner: &Value) -> Option<PromiseId> {
        self.groups
            .get(outer)
            .and_then(|group| group.promises.get(inner))
            .copied()
    }
}
