use super::layout::{LayoutBuilder, RowLayout};
use crate::{
    provider::{Correlation, CorrelationBuilder, ParentExprs, ParentUsage},
    CorrelatedAttribute, Correlator, Error, Result, ViewContext, ViewType,
};
use correlate_core::stmt::{Alias, Expr, ExprPath, Query, Source};

/// Alias the correlated root is bound to in a batched query.
pub(crate) const CORRELATED: &str = "correlated";

/// Alias iterating the batched keys.
pub(crate) const KEYS: &str = "batch";

pub(crate) const CORRELATION_KEY: &str = "correlation_key";
pub(crate) const CORRELATION_KEYS: &str = "correlation_keys";
pub(crate) const PARENT_ID: &str = "parent_id";
pub(crate) const PARENT_IDS: &str = "parent_ids";

/// A batched correlated query, before its keys are bound.
#[derive(Debug, Clone)]
pub(crate) struct CorrelationQuery {
    pub(crate) query: Query,
    pub(crate) layout: RowLayout,

    /// Row slot of the parent id, when the provider references a parent
    pub(crate) parent_slot: Option<usize>,

    pub(crate) batch_size: usize,

    /// Whether the membership parameter holds correlation values (or parent
    /// ids). Meaningless for a batch size of 1.
    pub(crate) batches_correlation_values: bool,
}

impl CorrelationQuery {
    /// Applies the attribute's provider and builds the query for one
    /// orientation.
    pub(crate) fn build(
        view: &ViewContext,
        attr: &CorrelatedAttribute,
        batch_size: usize,
        batches_correlation_values: bool,
    ) -> Result<Self> {
        let batched = batch_size > 1;
        let keys = Alias::new(KEYS);

        let (basis, parent, keys_param) = if !batched {
            (Expr::param(CORRELATION_KEY), Expr::param(PARENT_ID), None)
        } else if batches_correlation_values {
            (keys.whole(), Expr::param(PARENT_ID), Some(CORRELATION_KEYS))
        } else {
            (Expr::param(CORRELATION_KEY), keys.whole(), Some(PARENT_IDS))
        };

        let correlation = apply_provider(
            attr,
            Alias::new(CORRELATED),
            ParentExprs {
                view_root: parent.clone(),
                embedding_view: Some(parent),
            },
            basis,
        )?;

        if correlation.uses.view_root && correlation.uses.embedding_view {
            return Err(Error::unsupported_feature(format!(
                "the correlation for '{}' references both the view root and the embedding view",
                attr.path
            )));
        }

        let parent_slot = parent_view(view, attr, correlation.uses)?.and_then(|view| view.id_slot);

        if batched && correlation.limit.is_some() {
            return Err(Error::provider_misuse(
                attr.provider.name(),
                format!(
                    "limit/offset in the correlation for '{}' requires a batch size of 1; \
                     configured batch size is {batch_size}",
                    attr.path
                ),
            ));
        }

        let mut query = Query::default();
        let mut layout = RowLayout::builder();

        if let Some(param) = keys_param {
            query.from.push(Source::keys(keys.clone(), param));
            query.select.push(keys.whole());
            layout.key();
        }

        query.from.push(Source::table(
            correlation.entity.clone(),
            correlation.alias.clone(),
        ));
        query.filter = correlation.predicate.clone();

        let layout = select_correlated(&mut query, &mut layout, attr, &correlation)?;
        apply_rest(&mut query, view, attr, correlation);

        Ok(Self {
            query,
            layout,
            parent_slot,
            batch_size,
            batches_correlation_values,
        })
    }

    pub(crate) fn is_batched(&self) -> bool {
        self.batch_size > 1
    }
}

/// Runs the provider against a fresh builder.
pub(crate) fn apply_provider(
    attr: &CorrelatedAttribute,
    alias: Alias,
    parents: ParentExprs,
    basis: Expr,
) -> Result<Correlation> {
    let provider = attr.provider.name();
    let mut builder = CorrelationBuilder::new(provider, alias, parents);
    attr.provider.apply_correlation(&mut builder, basis)?;
    builder.finish()
}

/// Returns the view type acting as the parent context. The embedding view
/// wins when a provider references both.
pub(crate) fn parent_view<'a>(
    view: &'a ViewContext,
    attr: &CorrelatedAttribute,
    uses: ParentUsage,
) -> Result<Option<&'a ViewType>> {
    if !uses.any() {
        return Ok(None);
    }

    let (name, parent) = if uses.embedding_view {
        let Some(embedding_view) = &view.embedding_view else {
            return Err(Error::illegal_grouping_state(format!(
                "The use of EMBEDDING_VIEW in the correlation for '{}' is illegal because \
                 the attribute has no embedding view",
                attr.path
            )));
        };
        ("EMBEDDING_VIEW", embedding_view)
    } else {
        ("VIEW_ROOT", &view.view_root)
    };

    if !parent.has_id() {
        let kind = if uses.embedding_view {
            "embedding view"
        } else {
            "view root"
        };

        return Err(Error::illegal_grouping_state(format!(
            "The use of {name} in the correlation for '{}' is illegal because the {kind} \
             type '{}' does not declare an id",
            attr.path, parent.name
        )));
    }

    Ok(Some(parent))
}

/// Selects the map index and the element columns, finishing the layout.
pub(crate) fn select_correlated(
    query: &mut Query,
    layout: &mut LayoutBuilder,
    attr: &CorrelatedAttribute,
    correlation: &Correlation,
) -> Result<RowLayout> {
    let alias = &correlation.alias;

    if let Some(index) = &attr.index {
        query.select.push(alias.field(index.clone()));
        layout.index();
    }

    match &attr.correlator {
        Correlator::Basic { result: Some(field) } => {
            query.select.push(alias.field(field.clone()));
            Ok(layout.elements(1, false))
        }
        Correlator::Basic { result: None } => {
            query.select.push(alias.whole());
            Ok(layout.elements(1, false))
        }
        Correlator::Subview { fields } if fields.is_empty() => {
            Err(Error::invalid_configuration(format!(
                "sub-view of '{}' selects no fields",
                attr.path
            )))
        }
        Correlator::Subview { fields } => {
            query
                .select
                .extend(fields.iter().map(|field| alias.field(field.clone())));
            Ok(layout.elements(fields.len(), true))
        }
    }
}

/// Copies ordering, limit, fetches and parameters into `query`.
pub(crate) fn apply_rest(
    query: &mut Query,
    view: &ViewContext,
    attr: &CorrelatedAttribute,
    correlation: Correlation,
) {
    query.order_by = correlation.order_by;
    query.limit = correlation.limit;
    query.fetches = attr
        .fetches
        .iter()
        .map(|path| ExprPath::field(correlation.alias.clone(), path.clone()))
        .collect();

    let mut params = correlation.params;
    params.extend_missing(&view.secondary_params());
    params.extend_missing(&query.params);
    query.params = params;
}
