use super::{
    accumulator::ContainerAccumulator,
    correlation_query::{apply_provider, apply_rest, parent_view, select_correlated},
    fill_default::fill_defaults,
    grouping::{Grouping, Orientation, TupleGrouper},
    layout::RowLayout,
    populate::Populate,
    promise::PromiseId,
    Engine,
};
use crate::{provider::ParentExprs, CorrelatedAttribute, Error, Result, ViewContext};
use correlate_core::stmt::{Alias, Expr, Join, Params, Query, Source, Value, ValueRecord};

use indexmap::{map::Entry, IndexMap};
use tracing::{debug, warn};

/// Resolves an attribute with one correlated query joined to a copy of the
/// primary query.
#[derive(Debug)]
pub(crate) struct SubselectResolver<'a> {
    pub(crate) engine: &'a Engine,
    pub(crate) view: &'a ViewContext,
    pub(crate) attr: &'a CorrelatedAttribute,
    pub(crate) accumulator: ContainerAccumulator,
}

impl SubselectResolver<'_> {
    pub(crate) async fn resolve(&self, rows: &mut [ValueRecord]) -> Result<usize> {
        let (query, layout, parent_slot) = self.build()?;

        let grouper = TupleGrouper::new(self.attr.slot, parent_slot);
        grouper.check_bounds(&self.attr.path, rows)?;

        let orientation = if parent_slot.is_some() {
            Orientation::ByParent
        } else {
            Orientation::Flat
        };

        let Grouping {
            groups,
            mut promises,
            skipped,
            ..
        } = grouper.group(rows, orientation, self.accumulator.copier());

        if !groups.is_empty() {
            let response = self.engine.query_engine.exec(query).await?;
            let results = response.rows.into_values()?.collect().await?;

            // A key shared by several primary rows is joined once per row;
            // only the rows joined through the first one count.
            let mut discriminators = IndexMap::<PromiseId, Value>::new();

            let populate = Populate {
                path: &self.attr.path,
                slot: self.attr.slot,
                accumulator: &self.accumulator,
                layout: &layout,
            };

            populate.apply(results, &mut promises, rows, |row| {
                let key = row.key.as_ref()?;
                let outer = match orientation {
                    Orientation::Flat => &Value::Null,
                    _ => row.parent.as_ref()?,
                };
                let id = groups.get(outer)?.promises.get(key).copied()?;
                let discriminator = row.discriminator.clone().unwrap_or_default();

                match discriminators.entry(id) {
                    Entry::Occupied(first) => (*first.get() == discriminator).then_some(id),
                    Entry::Vacant(entry) => {
                        entry.insert(discriminator);
                        Some(id)
                    }
                }
            })?;
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
            ?orientation,
            promises = promises.len(),
            defaulted,
            "resolved correlated attribute with a sub-select"
        );

        Ok(usize::from(!groups.is_empty()))
    }

    fn build(&self) -> Result<(Query, RowLayout, Option<usize>)> {
        let attr = self.attr;
        let view = self.view;

        let Some(primary) = &view.primary else {
            return Err(Error::invalid_configuration(format!(
                "sub-select fetching of '{}' requires the primary query",
                attr.path
            )));
        };

        let Some(root_id) = view.view_root.id.as_ref().filter(|_| view.view_root.has_id()) else {
            return Err(Error::unsupported_feature(format!(
                "sub-select fetching of '{}' requires the view root type '{}' to declare an id",
                attr.path, view.view_root.name
            )));
        };

        if attr.basis.as_value().is_some_and(Value::is_null) {
            return Err(Error::invalid_configuration(format!(
                "sub-select fetching of '{}' requires a basis expression",
                attr.path
            )));
        }

        let root_id = view.view_root.alias.field(root_id.clone());

        let mut query = primary.clone();
        let limit = query.limit.take();
        query.select.clear();
        query.order_by.clear();
        query.fetches.clear();

        if limit.is_some_and(|limit| !limit.is_unbounded()) {
            if self.engine.query_engine.capability().subquery_limit {
                let mut limited = primary.clone();
                limited.select = vec![root_id.clone()];
                limited.fetches.clear();
                limited.params = Params::new();

                query.and_filter(Expr::in_subquery(root_id.clone(), limited));
            } else {
                warn!(
                    attribute = %attr.path,
                    "query engine does not support limits in subqueries; \
                     the sub-select ignores the limit of the primary query"
                );
            }
        }

        let alias = unique_alias(&query);
        let embedding_id = view.embedding_view.as_ref().and_then(|embedding| {
            embedding
                .id
                .as_ref()
                .map(|id| embedding.alias.field(id.clone()))
        });

        let correlation = apply_provider(
            attr,
            alias,
            ParentExprs {
                view_root: root_id.clone(),
                embedding_view: embedding_id.clone(),
            },
            attr.basis.clone(),
        )?;

        if correlation.limit.is_some() {
            return Err(Error::provider_misuse(
                attr.provider.name(),
                format!(
                    "wrongly uses limit/offset in the correlation for '{}' which might \
                     lead to wrong results with sub-select fetching",
                    attr.path
                ),
            ));
        }

        let parent = parent_view(view, attr, correlation.uses)?;
        let parent_slot = parent.and_then(|parent| parent.id_slot);

        query.joins.push(Join::inner(
            Source::table(correlation.entity.clone(), correlation.alias.clone()),
            correlation.predicate.clone().unwrap_or(Expr::from(true)),
        ));

        let mut layout = RowLayout::builder();
        query.select.push(root_id);
        layout.discriminator();

        if correlation.uses.embedding_view {
            query.select.push(embedding_id.unwrap_or_default());
            layout.parent();
        } else if correlation.uses.view_root {
            layout.parent_at(0);
        }

        query.select.push(attr.basis.clone());
        layout.key();

        let layout = select_correlated(&mut query, &mut layout, attr, &correlation)?;
        apply_rest(&mut query, view, attr, correlation);

        Ok((query, layout, parent_slot))
    }
}

/// An alias not bound by `query`.
fn unique_alias(query: &Query) -> Alias {
    let taken = |name: &str| query.aliases().any(|alias| alias.as_str() == name);

    let mut name = String::from("correlated");
    let mut n = 0;
    while taken(&name) {
        n += 1;
        name = format!("correlated_{n}");
    }

    Alias::new(name)
}
