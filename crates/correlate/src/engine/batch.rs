use super::{
    accumulator::ContainerAccumulator,
    correlation_query::{
        CorrelationQuery, CORRELATION_KEY, CORRELATION_KEYS, PARENT_ID, PARENT_IDS,
    },
    fill_default::fill_defaults,
    fixed_buffer::FixedBuffer,
    grouping::{Group, Grouping, Orientation, TupleGrouper},
    populate::Populate,
    promise::Promise,
    Engine,
};
use crate::{CorrelatedAttribute, Result, ViewContext};
use correlate_core::stmt::{Value, ValueRecord};

use tracing::{debug, trace};

/// Resolves an attribute by re-querying the correlated entity with batches
/// of keys.
#[derive(Debug)]
pub(crate) struct BatchResolver<'a> {
    pub(crate) engine: &'a Engine,
    pub(crate) view: &'a ViewContext,
    pub(crate) attr: &'a CorrelatedAttribute,
    pub(crate) batch_size: usize,
    pub(crate) accumulator: ContainerAccumulator,
}

/// The outer group a flush belongs to.
struct Batch<'a> {
    outer: &'a Value,
    group: &'a Group,
}

impl BatchResolver<'_> {
    /// Returns the number of queries issued.
    pub(crate) async fn resolve(&self, rows: &mut [ValueRecord]) -> Result<usize> {
        let expected = self
            .engine
            .config
            .expect_batch_correlation_values_for_path(&self.attr.path);

        let mut plan = CorrelationQuery::build(self.view, self.attr, self.batch_size, expected)?;

        let grouper = TupleGrouper::new(self.attr.slot, plan.parent_slot);
        grouper.check_bounds(&self.attr.path, rows)?;

        let orientation = grouper.orientation(rows);

        if plan.is_batched()
            && orientation.batches_correlation_values() != plan.batches_correlation_values
        {
            debug!(
                attribute = %self.attr.path,
                ?orientation,
                "rebuilding correlated query for the chosen orientation"
            );
            plan = CorrelationQuery::build(
                self.view,
                self.attr,
                self.batch_size,
                orientation.batches_correlation_values(),
            )?;
        }

        let Grouping {
            groups,
            mut promises,
            skipped,
            ..
        } = grouper.group(rows, orientation, self.accumulator.copier());

        let mut buffer = FixedBuffer::with_capacity(self.batch_size);
        let mut queries = 0;

        for (outer, group) in &groups {
            let batch = Batch { outer, group };

            for inner in group.promises.keys() {
                buffer.push(inner.clone());

                if buffer.is_full() {
                    self.flush(&plan, orientation, &batch, &mut buffer, &mut promises, rows)
                        .await?;
                    queries += 1;
                }
            }

            if !buffer.is_empty() {
                self.flush(&plan, orientation, &batch, &mut buffer, &mut promises, rows)
                    .await?;
                queries += 1;
            }
        }

        let defaulted = fill_defaults(
            &mut promises,
            &skipped,
            rows,
            self.attr.slot,
            &self.accumulator,
        );

        debug!(
            attribute = %self.attr.path,
            batch_size = self.batch_size,
            ?orientation,
            groups = groups.len(),
            promises = promises.len(),
            defaulted,
            queries,
            "resolved correlated attribute"
        );

        Ok(queries)
    }

    async fn flush(
        &self,
        plan: &CorrelationQuery,
        orientation: Orientation,
        batch: &Batch<'_>,
        buffer: &mut FixedBuffer<Value>,
        promises: &mut [Promise],
        rows: &mut [ValueRecord],
    ) -> Result<()> {
        let mut query = plan.query.clone();
        let parent_used = plan.parent_slot.is_some();

        if plan.is_batched() {
            buffer.clear_tail();

            if plan.batches_correlation_values {
                let keys = buffer
                    .padded()
                    .iter()
                    .map(|key| self.correlation_key(key.clone()))
                    .collect::<Result<Vec<_>>>()?;
                query.params.insert(CORRELATION_KEYS, Value::List(keys));

                if parent_used {
                    query.params.insert(PARENT_ID, batch.outer.clone());
                }
            } else {
                query
                    .params
                    .insert(PARENT_IDS, Value::List(buffer.padded().to_vec()));
                query
                    .params
                    .insert(CORRELATION_KEY, self.correlation_key(batch.outer.clone())?);
            }
        } else {
            let inner = buffer.as_slice()[0].clone();
            let (key, parent) = match orientation {
                Orientation::Flat => (inner, None),
                Orientation::ByParent => (inner, Some(batch.outer.clone())),
                Orientation::ByCorrelation => (batch.outer.clone(), Some(inner)),
            };

            query.params.insert(CORRELATION_KEY, self.correlation_key(key)?);
            if let Some(parent) = parent {
                query.params.insert(PARENT_ID, parent);
            }
        }

        trace!(
            attribute = %self.attr.path,
            keys = buffer.len(),
            "executing correlated batch"
        );

        let response = self.engine.query_engine.exec(query).await?;
        let results = response.rows.into_values()?.collect().await?;

        let populate = Populate {
            path: &self.attr.path,
            slot: self.attr.slot,
            accumulator: &self.accumulator,
            layout: &plan.layout,
        };

        if plan.is_batched() {
            populate.apply(results, promises, rows, |row| {
                let key = row.key.as_ref()?;
                batch.group.promises.get(key).copied()
            })?;
        } else {
            let inner = &buffer.as_slice()[0];
            let id = batch.group.promises.get(inner).copied();
            populate.apply(results, promises, rows, |_| id)?;
        }

        buffer.reset();
        Ok(())
    }

    /// Binds entity-typed keys as references.
    fn correlation_key(&self, key: Value) -> Result<Value> {
        match &self.attr.basis_entity {
            Some(entity) => self.engine.references.reference(entity, key),
            None => Ok(key),
        }
    }
}
