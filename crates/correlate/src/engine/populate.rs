use super::{
    accumulator::ContainerAccumulator,
    layout::{ResultRow, RowLayout},
    promise::{Promise, PromiseId},
};
use crate::{Error, Result};
use correlate_core::stmt::{Value, ValueRecord};

use indexmap::IndexMap;

/// Delivers the result rows of one correlated query to their promises.
#[derive(Debug)]
pub(crate) struct Populate<'a> {
    pub(crate) path: &'a str,
    pub(crate) slot: usize,
    pub(crate) accumulator: &'a ContainerAccumulator,
    pub(crate) layout: &'a RowLayout,
}

impl Populate<'_> {
    /// `lookup` maps a result row to the promise it contributes to, or
    /// `None` to ignore the row.
    pub(crate) fn apply(
        &self,
        results: Vec<Value>,
        promises: &mut [Promise],
        rows: &mut [ValueRecord],
        mut lookup: impl FnMut(&ResultRow) -> Option<PromiseId>,
    ) -> Result<()> {
        if self.accumulator.is_collection() {
            let mut containers = IndexMap::<PromiseId, Value>::new();

            for result in results {
                let row = self.layout.split(result)?;
                let Some(id) = lookup(&row) else {
                    continue;
                };

                // The container exists even when every element is null.
                let container = containers
                    .entry(id)
                    .or_insert_with(|| self.accumulator.create_container(0));

                if row.element.is_null() {
                    continue;
                }

                if self.accumulator.is_map() && row.index.as_ref().is_none_or(Value::is_null) {
                    continue;
                }

                self.accumulator.add(container, row.index, row.element);
            }

            let copier = self.accumulator.copier();
            for (id, container) in containers {
                promises[id.0].on_result(container, rows, self.slot, copier);
            }
        } else {
            let copier = self.accumulator.copier();

            for result in results {
                let row = self.layout.split(result)?;
                let Some(id) = lookup(&row) else {
                    continue;
                };

                let promise = &mut promises[id.0];
                if promise.is_resolved() {
                    return Err(Error::non_unique_result(format!(
                        "'{}' correlated more than one row to key {:?}",
                        self.path,
                        promise.key()
                    )));
                }

                promise.on_result(row.element, rows, self.slot, copier);
            }
        }

        Ok(())
    }
}
